//! Where a panel's collection comes from.

use std::sync::Arc;

use horizon_list_core::Subscriptions;

use crate::error::ListError;
use crate::model::{Collection, Entity, ParentEntity};

/// Callback that forwards an error to the panel's `error` signal.
pub type ErrorRelay = Arc<dyn Fn(&ListError) + Send + Sync>;

/// Supplies a panel with its backing collection.
///
/// The panel listens to the collection itself. A source only has to attach
/// whatever extra listeners it needs (to an owning entity, say) to the
/// subscription set it is handed; the panel drops that set when it rebinds.
pub trait DataSource<E: Entity>: Send + Sync {
    /// The collection to render. Called once per binding.
    fn collection(&self) -> Arc<Collection<E>>;

    /// Attach source-level listeners, forwarding errors through `relay`.
    fn bind(&self, _subs: &mut Subscriptions, _relay: ErrorRelay) {}

    /// Title shown instead of the configured one.
    fn title(&self) -> Option<String> {
        None
    }
}

/// A plain collection.
pub struct StaticSource<E: Entity> {
    collection: Arc<Collection<E>>,
}

impl<E: Entity> StaticSource<E> {
    /// Wrap `collection`.
    pub fn new(collection: Arc<Collection<E>>) -> Self {
        Self { collection }
    }
}

impl<E: Entity> DataSource<E> for StaticSource<E> {
    fn collection(&self) -> Arc<Collection<E>> {
        self.collection.clone()
    }
}

/// The nested collection of a parent entity.
///
/// Falls back to the configured collection, then to a fresh empty one, when
/// the entity has no collection of its own.
pub struct ParentSource<P: ParentEntity> {
    model: Arc<P>,
    collection: Arc<Collection<P::Child>>,
}

impl<P: ParentEntity> ParentSource<P> {
    /// Resolve the collection of `model`.
    pub fn new(model: Arc<P>, fallback: Option<Arc<Collection<P::Child>>>) -> Self {
        let collection = model
            .contents()
            .or(fallback)
            .unwrap_or_else(Collection::empty);
        Self { model, collection }
    }

    /// The bound entity.
    pub fn model(&self) -> &Arc<P> {
        &self.model
    }
}

impl<P: ParentEntity> DataSource<P::Child> for ParentSource<P> {
    fn collection(&self) -> Arc<Collection<P::Child>> {
        self.collection.clone()
    }

    fn bind(&self, subs: &mut Subscriptions, relay: ErrorRelay) {
        if let Some(errors) = self.model.errors() {
            subs.listen(errors, move |err| relay(err));
        }
    }

    fn title(&self) -> Option<String> {
        self.model.title()
    }
}
