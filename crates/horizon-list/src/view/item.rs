//! Item views: the rendered representation of one entity.

use std::sync::Arc;
use std::time::Duration;

use horizon_list_core::Signal;
use parking_lot::Mutex;

use crate::model::Entity;
use crate::selection::KeyboardModifiers;

/// Options a panel passes when it creates an item view.
#[derive(Debug)]
pub struct ItemViewOptions<E> {
    /// The entity to render.
    pub model: Arc<E>,
    /// Duration of the view's own effects.
    pub fx_speed: Duration,
    /// Whether the view starts expanded.
    pub expanded: bool,
    /// Whether the view's selector starts visible.
    pub selectable: bool,
    /// Whether the view starts selected.
    pub selected: bool,
    /// Whether the view may be dragged.
    pub draggable: bool,
}

impl<E> Clone for ItemViewOptions<E> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            fx_speed: self.fx_speed,
            expanded: self.expanded,
            selectable: self.selectable,
            selected: self.selected,
            draggable: self.draggable,
        }
    }
}

/// Interaction events an item view emits.
///
/// A panel re-emits every one of these on its `view_event` signal, tagged
/// with the view that emitted it.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemViewEvent {
    /// The view became selected.
    Selected {
        /// Modifiers held during the gesture.
        modifiers: KeyboardModifiers,
    },
    /// The view stopped being selected.
    Deselected,
    /// The view's details were expanded.
    Expanded,
    /// The view's details were collapsed.
    Collapsed,
    /// The view finished rendering.
    Rendered,
    /// The user started dragging the view.
    DragStart,
    /// The user stopped dragging the view.
    DragEnd,
    /// The view hit a failure.
    Error {
        /// Description of the failure.
        message: String,
    },
}

impl ItemViewEvent {
    /// Event name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ItemViewEvent::Selected { .. } => "selected",
            ItemViewEvent::Deselected => "de-selected",
            ItemViewEvent::Expanded => "expanded",
            ItemViewEvent::Collapsed => "collapsed",
            ItemViewEvent::Rendered => "rendered",
            ItemViewEvent::DragStart => "draggable:dragstart",
            ItemViewEvent::DragEnd => "draggable:dragend",
            ItemViewEvent::Error { .. } => "error",
        }
    }

    /// Name of the event as re-emitted by a panel.
    pub fn forwarded_name(&self) -> String {
        format!("view:{}", self.name())
    }
}

/// The contract a panel needs from an item view.
///
/// Panels create views through [`from_options`](Self::from_options) (or a
/// factory configured on the panel), share them as `Arc<Self>`, and listen to
/// [`events`](Self::events). Views keep their own selection and expansion
/// flags; the panel reads them back.
pub trait ItemView: Send + Sync + 'static {
    /// Entity type rendered by this view.
    type Model: Entity;

    /// Create a view.
    fn from_options(options: ItemViewOptions<Self::Model>) -> Self
    where
        Self: Sized;

    /// The entity this view renders.
    fn model(&self) -> &Arc<Self::Model>;

    /// Interaction events.
    fn events(&self) -> &Signal<ItemViewEvent>;

    /// Render, animating over `speed`.
    fn render(&self, speed: Duration);

    /// Tear down the rendered representation.
    fn remove(&self);

    /// Select the view. Emits `Selected` unless it already was.
    fn select(&self, modifiers: KeyboardModifiers);

    /// Deselect the view. Emits `Deselected` unless it already was.
    fn deselect(&self);

    /// Whether the view is selected.
    fn is_selected(&self) -> bool;

    /// Expand details.
    fn expand(&self);

    /// Collapse details.
    fn collapse(&self);

    /// Whether details are expanded.
    fn is_expanded(&self) -> bool;

    /// Reveal the selector over `speed`.
    fn show_selector(&self, speed: Duration);

    /// Hide the selector over `speed`, deselecting the view.
    fn hide_selector(&self, speed: Duration);
}

#[derive(Debug, Default)]
struct ItemState {
    selected: bool,
    expanded: bool,
    selector_shown: bool,
    renders: u32,
    removed: bool,
    last_speed: Option<Duration>,
}

/// The default item view: keeps its flags in memory and emits events.
pub struct ListItemView<E> {
    model: Arc<E>,
    fx_speed: Duration,
    draggable: bool,
    state: Mutex<ItemState>,
    events: Signal<ItemViewEvent>,
}

impl<E: Entity> ListItemView<E> {
    /// Duration configured for this view's effects.
    pub fn fx_speed(&self) -> Duration {
        self.fx_speed
    }

    /// Whether the view may be dragged.
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    /// Whether the selector is visible.
    pub fn selector_shown(&self) -> bool {
        self.state.lock().selector_shown
    }

    /// How many times the view was rendered.
    pub fn render_count(&self) -> u32 {
        self.state.lock().renders
    }

    /// Whether [`remove`](ItemView::remove) was called.
    pub fn is_removed(&self) -> bool {
        self.state.lock().removed
    }

    /// Speed passed to the last render or selector change.
    pub fn last_speed(&self) -> Option<Duration> {
        self.state.lock().last_speed
    }

    /// Start a drag. Ignored unless the view is draggable.
    pub fn drag_start(&self) {
        if self.draggable {
            self.events.emit(ItemViewEvent::DragStart);
        }
    }

    /// End a drag.
    pub fn drag_end(&self) {
        if self.draggable {
            self.events.emit(ItemViewEvent::DragEnd);
        }
    }

    /// Report a failure.
    pub fn report_error(&self, message: impl Into<String>) {
        self.events.emit(ItemViewEvent::Error {
            message: message.into(),
        });
    }

    /// Flip a flag and emit `event` if it changed.
    fn transition(&self, event: ItemViewEvent, apply: impl FnOnce(&mut ItemState) -> bool) {
        let changed = apply(&mut self.state.lock());
        if changed {
            self.events.emit(event);
        }
    }
}

impl<E: Entity> ItemView for ListItemView<E> {
    type Model = E;

    fn from_options(options: ItemViewOptions<E>) -> Self {
        Self {
            model: options.model,
            fx_speed: options.fx_speed,
            draggable: options.draggable,
            state: Mutex::new(ItemState {
                selected: options.selected,
                expanded: options.expanded,
                selector_shown: options.selectable,
                ..ItemState::default()
            }),
            events: Signal::new(),
        }
    }

    fn model(&self) -> &Arc<E> {
        &self.model
    }

    fn events(&self) -> &Signal<ItemViewEvent> {
        &self.events
    }

    fn render(&self, speed: Duration) {
        {
            let mut state = self.state.lock();
            state.renders += 1;
            state.last_speed = Some(speed);
        }
        self.events.emit(ItemViewEvent::Rendered);
    }

    fn remove(&self) {
        self.state.lock().removed = true;
    }

    fn select(&self, modifiers: KeyboardModifiers) {
        self.transition(ItemViewEvent::Selected { modifiers }, |s| {
            !std::mem::replace(&mut s.selected, true)
        });
    }

    fn deselect(&self) {
        self.transition(ItemViewEvent::Deselected, |s| {
            std::mem::replace(&mut s.selected, false)
        });
    }

    fn is_selected(&self) -> bool {
        self.state.lock().selected
    }

    fn expand(&self) {
        self.transition(ItemViewEvent::Expanded, |s| {
            !std::mem::replace(&mut s.expanded, true)
        });
    }

    fn collapse(&self) {
        self.transition(ItemViewEvent::Collapsed, |s| {
            std::mem::replace(&mut s.expanded, false)
        });
    }

    fn is_expanded(&self) -> bool {
        self.state.lock().expanded
    }

    fn show_selector(&self, speed: Duration) {
        let mut state = self.state.lock();
        state.selector_shown = true;
        state.last_speed = Some(speed);
    }

    fn hide_selector(&self, speed: Duration) {
        {
            let mut state = self.state.lock();
            state.selector_shown = false;
            state.last_speed = Some(speed);
        }
        self.deselect();
    }
}

impl<E: Entity> std::fmt::Debug for ListItemView<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ListItemView")
            .field("model", &self.model.id())
            .field("selected", &state.selected)
            .field("expanded", &state.expanded)
            .finish()
    }
}
