//! The filter/search pipeline.
//!
//! [`compute_visible`] derives the view-sequence: the ordered subsequence of a
//! collection accepted by every filter and, when a query is set, by the
//! entity's own [`matches_all`](super::Entity::matches_all).

use std::sync::Arc;

use super::collection::Collection;
use super::entity::Entity;

/// A predicate over an entity.
pub type Filter<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Wrap a closure as a [`Filter`].
pub fn filter<E, F>(predicate: F) -> Filter<E>
where
    F: Fn(&E) -> bool + Send + Sync + 'static,
{
    Arc::new(predicate)
}

/// Whether `model` passes every filter and the query.
pub fn passes<E: Entity>(model: &E, filters: &[Filter<E>], query: &str) -> bool {
    filters.iter().all(|f| f(model)) && (query.is_empty() || model.matches_all(query))
}

/// The ordered view-sequence for `collection` under `filters` and `query`.
///
/// A pure function of its inputs: collection order is preserved, filters are
/// ANDed, and an empty query passes everything.
pub fn compute_visible<E: Entity>(
    collection: &Collection<E>,
    filters: &[Filter<E>],
    query: &str,
) -> Vec<Arc<E>> {
    collection.filter(|model| passes(model, filters, query))
}
