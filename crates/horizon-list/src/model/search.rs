//! Free-text query matching.
//!
//! A query is split on whitespace into terms; double-quoted phrases stay
//! whole. A `key=value` term only matches the field named `key`, any other
//! term matches when it occurs in some field. Matching is case-insensitive
//! and every term has to match.

use std::sync::LazyLock;

use regex::Regex;

use super::entity::SearchField;

static TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:[\w.-]+=)?"[^"]*"|\S+"#).expect("term pattern is valid")
});

static KEYED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w.-]+)=(.+)$").expect("keyed pattern is valid"));

/// One parsed query term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Field the term is restricted to, lowercased.
    pub key: Option<String>,
    /// Text to look for, lowercased and unquoted.
    pub text: String,
}

impl Term {
    /// Whether this term matches any of `fields`.
    pub fn matches(&self, fields: &[SearchField]) -> bool {
        fields.iter().any(|field| {
            let key_ok = self
                .key
                .as_deref()
                .is_none_or(|key| field.key.eq_ignore_ascii_case(key));
            key_ok && field.value.to_lowercase().contains(&self.text)
        })
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

fn parse_term(raw: &str) -> Option<Term> {
    let (key, text) = match KEYED.captures(raw) {
        Some(caps) => (Some(caps[1].to_lowercase()), unquote(&caps[2]).to_lowercase()),
        None => (None, unquote(raw).to_lowercase()),
    };
    if text.is_empty() {
        return None;
    }
    Some(Term { key, text })
}

/// Split a query into terms. Empty and blank queries yield no terms.
pub fn parse_query(query: &str) -> Vec<Term> {
    TERM.find_iter(query)
        .filter_map(|m| parse_term(m.as_str()))
        .collect()
}

/// Whether every term of `query` matches one of `fields`.
pub fn matches_all(fields: &[SearchField], query: &str) -> bool {
    parse_query(query).iter().all(|term| term.matches(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<SearchField> {
        vec![
            SearchField::new("name", "Illumina reads R1"),
            SearchField::new("extension", "fastqsanger"),
            SearchField::new("tag", "name:experiment"),
        ]
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(matches_all(&fields(), ""));
        assert!(matches_all(&fields(), "   "));
        assert!(matches_all(&[], ""));
    }

    #[test]
    fn test_terms_are_case_insensitive_substrings() {
        assert!(matches_all(&fields(), "illumina"));
        assert!(matches_all(&fields(), "READS fastq"));
        assert!(!matches_all(&fields(), "reads bam"));
    }

    #[test]
    fn test_keyed_terms_only_match_their_field() {
        assert!(matches_all(&fields(), "extension=fastq"));
        assert!(!matches_all(&fields(), "name=fastq"));
        assert!(matches_all(&fields(), "Name=R1"));
    }

    #[test]
    fn test_quoted_phrases_stay_whole() {
        let terms = parse_query(r#""reads R1" name="illumina reads""#);
        assert_eq!(
            terms,
            vec![
                Term {
                    key: None,
                    text: "reads r1".into()
                },
                Term {
                    key: Some("name".into()),
                    text: "illumina reads".into()
                },
            ]
        );
        assert!(matches_all(&fields(), r#""reads r1""#));
        assert!(!matches_all(&fields(), r#""r1 reads""#));
    }

    #[test]
    fn test_patterns_compile() {
        assert!(LazyLock::force(&TERM).is_match("reads"));
        assert!(LazyLock::force(&KEYED).is_match("name=reads"));
        assert_eq!(parse_query("a\tb\n  c").len(), 3);
    }

    #[test]
    fn test_empty_phrase_is_ignored() {
        assert!(parse_query(r#""""#).is_empty());
        assert!(matches_all(&fields(), r#""" illumina"#));
    }
}
