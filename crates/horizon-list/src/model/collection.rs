//! Observable, ordered collections of entities.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use horizon_list_core::Signal;
use horizon_list_core::logging::targets;
use parking_lot::RwLock;

use super::entity::Entity;
use crate::error::ListError;

/// Entities added and removed by one collection mutation.
pub struct UpdateDelta<E> {
    /// Entities added, in insertion order.
    pub added: Vec<Arc<E>>,
    /// Entities removed, in removal order.
    pub removed: Vec<Arc<E>>,
}

impl<E> UpdateDelta<E> {
    /// Combined number of added and removed entities.
    pub fn total(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    /// Whether the delta carries no change.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl<E> Clone for UpdateDelta<E> {
    fn clone(&self) -> Self {
        Self {
            added: self.added.clone(),
            removed: self.removed.clone(),
        }
    }
}

impl<E: Entity> std::fmt::Debug for UpdateDelta<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateDelta")
            .field("added", &self.added.iter().map(|m| m.id()).collect::<Vec<_>>())
            .field("removed", &self.removed.iter().map(|m| m.id()).collect::<Vec<_>>())
            .finish()
    }
}

/// Signals emitted by a [`Collection`].
pub struct CollectionSignals<E> {
    /// Emitted after entities were added or removed.
    pub update: Signal<UpdateDelta<E>>,

    /// Emitted after the whole contents were replaced.
    pub reset: Signal<()>,

    /// Emitted when the collection (or whatever feeds it) reports a failure.
    pub error: Signal<ListError>,
}

impl<E: Entity> Default for CollectionSignals<E> {
    fn default() -> Self {
        Self {
            update: Signal::new(),
            reset: Signal::new(),
            error: Signal::new(),
        }
    }
}

/// Ordering used by sorted collections.
pub type Comparator<E> = Arc<dyn Fn(&E, &E) -> Ordering + Send + Sync>;

/// An ordered set of entities, unique by id, that announces its mutations.
///
/// Mutations update the contents first and emit afterwards, with no lock held,
/// so listeners may read (or mutate) the collection from their slots.
///
/// # Example
///
/// ```ignore
/// use horizon_list::model::Collection;
///
/// let datasets = Collection::new();
/// datasets.signals().update.connect(|delta| {
///     println!("{} added, {} removed", delta.added.len(), delta.removed.len());
/// });
/// datasets.add(Arc::new(dataset));
/// ```
pub struct Collection<E: Entity> {
    models: RwLock<Vec<Arc<E>>>,
    comparator: Option<Comparator<E>>,
    signals: CollectionSignals<E>,
}

impl<E: Entity> Default for Collection<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Collection<E> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            models: RwLock::new(Vec::new()),
            comparator: None,
            signals: CollectionSignals::default(),
        }
    }

    /// Create an empty collection behind an `Arc`.
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Create a collection holding `models`. Later duplicates of an id are dropped.
    pub fn from_models(models: Vec<Arc<E>>) -> Self {
        let collection = Self::new();
        *collection.models.write() = dedup(models);
        collection
    }

    /// Keep the collection sorted by `compare`, sorting the current contents.
    pub fn with_comparator<F>(mut self, compare: F) -> Self
    where
        F: Fn(&E, &E) -> Ordering + Send + Sync + 'static,
    {
        let compare: Comparator<E> = Arc::new(compare);
        self.models.get_mut().sort_by(|a, b| compare(a, b));
        self.comparator = Some(compare);
        self
    }

    /// A new collection of the same kind (same ordering) holding `models`.
    pub fn derive(&self, models: Vec<Arc<E>>) -> Self {
        let mut models = dedup(models);
        if let Some(compare) = &self.comparator {
            models.sort_by(|a, b| compare(a, b));
        }
        Self {
            models: RwLock::new(models),
            comparator: self.comparator.clone(),
            signals: CollectionSignals::default(),
        }
    }

    /// The collection's signals.
    pub fn signals(&self) -> &CollectionSignals<E> {
        &self.signals
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    /// Whether the collection holds no entities.
    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }

    /// Snapshot of the contents, in order.
    pub fn models(&self) -> Vec<Arc<E>> {
        self.models.read().clone()
    }

    /// Entities accepted by `predicate`, in collection order.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<Arc<E>>
    where
        P: FnMut(&E) -> bool,
    {
        self.models
            .read()
            .iter()
            .filter(|m| predicate(m))
            .cloned()
            .collect()
    }

    /// Entity with the given id.
    pub fn get(&self, id: &E::Id) -> Option<Arc<E>> {
        self.models.read().iter().find(|m| m.id() == *id).cloned()
    }

    /// Whether an entity with the given id is present.
    pub fn contains(&self, id: &E::Id) -> bool {
        self.index_of(id).is_some()
    }

    /// Position of the entity with the given id.
    pub fn index_of(&self, id: &E::Id) -> Option<usize> {
        self.models.read().iter().position(|m| m.id() == *id)
    }

    /// Add one entity. Returns `false` if its id is already present.
    pub fn add(&self, model: Arc<E>) -> bool {
        self.insert(None, model)
    }

    /// Add one entity at `index` (clamped). Sorted collections ignore the index.
    pub fn add_at(&self, index: usize, model: Arc<E>) -> bool {
        self.insert(Some(index), model)
    }

    fn insert(&self, index: Option<usize>, model: Arc<E>) -> bool {
        {
            let mut models = self.models.write();
            let id = model.id();
            if models.iter().any(|m| m.id() == id) {
                tracing::trace!(target: targets::COLLECTION, ?id, "duplicate id ignored");
                return false;
            }
            let at = self.position_for(&models, &model, index);
            models.insert(at, model.clone());
        }
        self.signals.update.emit(UpdateDelta {
            added: vec![model],
            removed: Vec::new(),
        });
        true
    }

    fn position_for(&self, models: &[Arc<E>], model: &E, index: Option<usize>) -> usize {
        match (&self.comparator, index) {
            (Some(compare), _) => models
                .iter()
                .position(|m| compare(m, model) == Ordering::Greater)
                .unwrap_or(models.len()),
            (None, Some(index)) => index.min(models.len()),
            (None, None) => models.len(),
        }
    }

    /// Add several entities as one update. Returns how many were new.
    pub fn add_all(&self, models: Vec<Arc<E>>) -> usize {
        let added = {
            let mut current = self.models.write();
            let mut seen: HashSet<E::Id> = current.iter().map(|m| m.id()).collect();
            let mut added = Vec::new();
            for model in models {
                if !seen.insert(model.id()) {
                    continue;
                }
                let at = self.position_for(&current, &model, None);
                current.insert(at, model.clone());
                added.push(model);
            }
            added
        };
        let count = added.len();
        if count > 0 {
            self.signals.update.emit(UpdateDelta {
                added,
                removed: Vec::new(),
            });
        }
        count
    }

    /// Remove the entity with the given id.
    pub fn remove(&self, id: &E::Id) -> Option<Arc<E>> {
        let removed = {
            let mut models = self.models.write();
            let at = models.iter().position(|m| m.id() == *id)?;
            models.remove(at)
        };
        self.signals.update.emit(UpdateDelta {
            added: Vec::new(),
            removed: vec![removed.clone()],
        });
        Some(removed)
    }

    /// Remove every entity whose id is listed, as one update.
    pub fn remove_all(&self, ids: &[E::Id]) -> Vec<Arc<E>> {
        let removed: Vec<Arc<E>> = {
            let mut models = self.models.write();
            let (gone, kept): (Vec<_>, Vec<_>) =
                models.drain(..).partition(|m| ids.contains(&m.id()));
            *models = kept;
            gone
        };
        if !removed.is_empty() {
            self.signals.update.emit(UpdateDelta {
                added: Vec::new(),
                removed: removed.clone(),
            });
        }
        removed
    }

    /// Replace the contents to match `models`, as one update.
    ///
    /// Entities whose id is absent from `models` are removed, new ids are
    /// added. Ids present on both sides keep their current entity.
    pub fn set(&self, models: Vec<Arc<E>>) -> UpdateDelta<E> {
        let delta = {
            let mut current = self.models.write();
            let incoming = dedup(models);
            let wanted: HashSet<E::Id> = incoming.iter().map(|m| m.id()).collect();
            let (removed, mut kept): (Vec<_>, Vec<_>) =
                current.drain(..).partition(|m| !wanted.contains(&m.id()));
            let present: HashSet<E::Id> = kept.iter().map(|m| m.id()).collect();
            let mut added = Vec::new();
            for model in incoming {
                if present.contains(&model.id()) {
                    continue;
                }
                let at = self.position_for(&kept, &model, None);
                kept.insert(at, model.clone());
                added.push(model);
            }
            *current = kept;
            UpdateDelta { added, removed }
        };
        if !delta.is_empty() {
            self.signals.update.emit(delta.clone());
        }
        delta
    }

    /// Replace the whole contents without an itemized delta.
    pub fn reset(&self, models: Vec<Arc<E>>) {
        {
            let mut current = self.models.write();
            let mut models = dedup(models);
            if let Some(compare) = &self.comparator {
                models.sort_by(|a, b| compare(a, b));
            }
            *current = models;
        }
        tracing::debug!(target: targets::COLLECTION, len = self.len(), "collection reset");
        self.signals.reset.emit(());
    }

    /// Announce a failure to listeners of the `error` signal.
    pub fn report_error(&self, error: ListError) {
        tracing::debug!(target: targets::COLLECTION, %error, "collection error reported");
        self.signals.error.emit(error);
    }
}

impl<E: Entity> std::fmt::Debug for Collection<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("len", &self.len())
            .field("sorted", &self.comparator.is_some())
            .finish()
    }
}

fn dedup<E: Entity>(models: Vec<Arc<E>>) -> Vec<Arc<E>> {
    let mut seen = HashSet::new();
    models.into_iter().filter(|m| seen.insert(m.id())).collect()
}
