use std::sync::Arc;

use horizon_list_core::Signal;

use super::actions::DragPayload;
use crate::error::ListError;
use crate::view::{ItemView, ItemViewEvent};

/// Signals emitted by a list panel.
///
/// Connections made by the panel itself during construction run before any
/// connection made afterwards.
pub struct PanelSignals<V: ItemView> {
    // -------------------------------------------------------------------------
    // Errors and loading
    // -------------------------------------------------------------------------
    /// A collection, bound entity or item view reported a failure.
    pub error: Signal<ListError>,

    /// Emit to show the loading indicator.
    pub loading: Signal<()>,

    /// Emit to hide the loading indicator.
    pub loading_done: Signal<()>,

    // -------------------------------------------------------------------------
    // Render lifecycle
    // -------------------------------------------------------------------------
    /// A full render finished fading in.
    pub rendered: Signal<()>,

    /// The first full render finished. Emitted once per panel.
    pub rendered_initial: Signal<()>,

    /// The item views were rebuilt.
    pub views_ready: Signal<Vec<Arc<V>>>,

    /// A single view was inserted into the list.
    pub view_attached: Signal<Arc<V>>,

    /// A single inserted view finished its enter effect.
    pub view_attached_rendered: Signal<Arc<V>>,

    /// A single view was taken out of the list.
    pub view_removed: Signal<Arc<V>>,

    /// A single removed view finished its exit effect.
    pub view_removed_rendered: Signal<Arc<V>>,

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------
    /// A new query was applied. Args: the query.
    pub search_searching: Signal<String>,

    /// The query was cleared.
    pub search_clear: Signal<()>,

    // -------------------------------------------------------------------------
    // Item views
    // -------------------------------------------------------------------------
    /// Every event of every item view, with the view that emitted it.
    pub view_event: Signal<(Arc<V>, ItemViewEvent)>,

    /// A drag started on a view of a panel with dragging enabled.
    pub drag_start: Signal<DragPayload<V::Model>>,
}

impl<V: ItemView> Default for PanelSignals<V> {
    fn default() -> Self {
        Self {
            error: Signal::new(),
            loading: Signal::new(),
            loading_done: Signal::new(),
            rendered: Signal::new(),
            rendered_initial: Signal::new(),
            views_ready: Signal::new(),
            view_attached: Signal::new(),
            view_attached_rendered: Signal::new(),
            view_removed: Signal::new(),
            view_removed_rendered: Signal::new(),
            search_searching: Signal::new(),
            search_clear: Signal::new(),
            view_event: Signal::new(),
            drag_start: Signal::new(),
        }
    }
}
