//! A list panel bound to the nested collection of one entity.

use std::ops::Deref;
use std::sync::Arc;

use horizon_list_core::Signal;
use horizon_list_core::logging::targets;
use parking_lot::Mutex;

use super::list_panel::ListPanel;
use super::source::{ParentSource, StaticSource};
use crate::config::PanelConfig;
use crate::model::{Collection, Entity, ParentEntity};
use crate::view::ItemView;

/// A [`ListPanel`] showing the contents of a [`ParentEntity`].
///
/// The panel can be rebound to another entity with
/// [`set_model`](Self::set_model); every listener tied to the previous entity
/// and its collection is dropped first. Selectors start hidden.
///
/// Dereferences to the underlying [`ListPanel`].
pub struct ModelListPanel<P, V>
where
    P: ParentEntity,
    V: ItemView<Model = P::Child>,
{
    panel: ListPanel<V>,
    model: Mutex<Option<Arc<P>>>,
    /// Id of the last entity bound, kept across unbinding.
    last_id: Mutex<Option<P::Id>>,
    fallback: Option<Arc<Collection<P::Child>>>,
    new_model: Signal<Arc<P>>,
}

impl<P, V> ModelListPanel<P, V>
where
    P: ParentEntity,
    V: ItemView<Model = P::Child>,
{
    /// Create a panel bound to `model`.
    ///
    /// A collection set on `config` is used whenever the bound entity has no
    /// collection of its own.
    pub fn new(config: PanelConfig<V>, model: Option<Arc<P>>) -> Self {
        let fallback = config.collection.clone();
        let panel = Self {
            panel: ListPanel::build(config, false),
            model: Mutex::new(None),
            last_id: Mutex::new(None),
            fallback,
            new_model: Signal::new(),
        };
        panel.set_model(model);
        panel
    }

    /// Rebind to `model`, or to an empty list when `None`.
    ///
    /// Emits `new_model` when the entity differs from the last one bound,
    /// even if the panel was unbound in between. Views are freed; render
    /// again to show the new contents.
    pub fn set_model(&self, model: Option<Arc<P>>) {
        self.model.lock().take();

        match model {
            Some(model) => {
                let id = model.id();
                tracing::debug!(target: targets::PANEL, ?id, "binding model");
                let previous_id = self.last_id.lock().replace(id.clone());
                *self.model.lock() = Some(model.clone());
                self.panel.set_source(Arc::new(ParentSource::new(
                    model.clone(),
                    self.fallback.clone(),
                )));
                if previous_id.is_some_and(|prev| prev != id) {
                    self.new_model.emit(model);
                }
            }
            None => {
                tracing::debug!(target: targets::PANEL, "unbinding model");
                self.panel
                    .set_source(Arc::new(StaticSource::new(Collection::empty())));
            }
        }
    }

    /// The bound entity.
    pub fn model(&self) -> Option<Arc<P>> {
        self.model.lock().clone()
    }

    /// Emitted when a different entity is bound. Args: the new entity.
    pub fn new_model(&self) -> &Signal<Arc<P>> {
        &self.new_model
    }

    /// The underlying panel.
    pub fn panel(&self) -> &ListPanel<V> {
        &self.panel
    }
}

impl<P, V> Deref for ModelListPanel<P, V>
where
    P: ParentEntity,
    V: ItemView<Model = P::Child>,
{
    type Target = ListPanel<V>;

    fn deref(&self) -> &ListPanel<V> {
        &self.panel
    }
}

impl<P, V> std::fmt::Debug for ModelListPanel<P, V>
where
    P: ParentEntity,
    V: ItemView<Model = P::Child>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelListPanel")
            .field("model", &self.model.lock().as_ref().map(|m| m.id()))
            .field("panel", &self.panel)
            .finish()
    }
}
