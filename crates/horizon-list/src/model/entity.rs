//! Entities: the records a list renders.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use horizon_list_core::Signal;

use super::collection::Collection;
use super::search;
use crate::error::ListError;

/// One searchable `(key, value)` pair exposed by an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchField {
    /// Field name used by `key=value` query terms.
    pub key: String,
    /// Text matched by the query.
    pub value: String,
}

impl SearchField {
    /// Create a search field.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A record held by a [`Collection`] and rendered by one item view.
///
/// Entities are shared as `Arc<E>`; the collection owns them and views keep
/// non-owning clones of the same allocation, so two views refer to the same
/// entity exactly when their `Arc`s point at the same value.
///
/// # Example
///
/// ```
/// use horizon_list::model::{Entity, SearchField};
///
/// struct Dataset {
///     id: u32,
///     name: String,
///     format: String,
/// }
///
/// impl Entity for Dataset {
///     type Id = u32;
///
///     fn id(&self) -> u32 {
///         self.id
///     }
///
///     fn search_fields(&self) -> Vec<SearchField> {
///         vec![
///             SearchField::new("name", &self.name),
///             SearchField::new("format", &self.format),
///         ]
///     }
/// }
///
/// let ds = Dataset { id: 1, name: "reads.fastq".into(), format: "fastqsanger".into() };
/// assert!(ds.matches_all("reads format=fastq"));
/// assert!(!ds.matches_all("format=bam"));
/// ```
pub trait Entity: Send + Sync + 'static {
    /// Stable identifier type.
    type Id: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// The entity's stable identifier.
    fn id(&self) -> Self::Id;

    /// Fields inspected by free-text search. Defaults to none.
    fn search_fields(&self) -> Vec<SearchField> {
        Vec::new()
    }

    /// Whether every term of `query` matches this entity.
    ///
    /// The default tokenizes the query and matches terms against
    /// [`search_fields`](Self::search_fields); an empty query matches.
    fn matches_all(&self, query: &str) -> bool {
        search::matches_all(&self.search_fields(), query)
    }
}

/// An entity that owns a nested collection, bound by a model list panel.
pub trait ParentEntity: Entity {
    /// Entity type of the nested collection.
    type Child: Entity;

    /// The nested collection, if this entity carries one.
    fn contents(&self) -> Option<Arc<Collection<Self::Child>>>;

    /// Errors reported by the entity itself.
    fn errors(&self) -> Option<&Signal<ListError>> {
        None
    }

    /// Title a panel bound to this entity shows.
    fn title(&self) -> Option<String> {
        None
    }
}
