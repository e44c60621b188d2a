//! The list panel.

use std::sync::{Arc, Weak};
use std::time::Duration;

use horizon_list_core::logging::targets;
use horizon_list_core::{ConnectionGuard, Done, StepQueue, Subscriptions, step};
use parking_lot::Mutex;

use super::actions::{BulkAction, DragPayload};
use super::content::{Content, Controls};
use super::signals::PanelSignals;
use super::source::{DataSource, ErrorRelay, StaticSource};
use crate::config::{PanelConfig, PanelSettings, ViewFactory};
use crate::error::{ListError, Result};
use crate::fx::{Effect, FxDriver, FxTarget, Stage, ViewKey};
use crate::model::{Collection, Entity, Filter, UpdateDelta, compute_visible};
use crate::selection::{KeyboardModifiers, SelectionState, view_range};
use crate::view::{ItemView, ItemViewEvent, ItemViewOptions};

type Model<V> = <V as ItemView>::Model;
type ModelId<V> = <Model<V> as Entity>::Id;

/// Duration of the loading indicator's effects.
const INDICATOR_FX: Duration = Duration::from_millis(40);

/// Message shown by the loading indicator.
const LOADING_MESSAGE: &str = "loading...";

/// One live item view and everything the panel keeps for it.
struct ViewEntry<V> {
    key: ViewKey,
    view: Arc<V>,
    subs: Subscriptions,
    queue: StepQueue,
}

struct PanelState<V: ItemView> {
    source: Arc<dyn DataSource<Model<V>>>,
    collection: Arc<Collection<Model<V>>>,
    source_subs: Subscriptions,
    views: Vec<ViewEntry<V>>,
    filters: Vec<Filter<Model<V>>>,
    search_for: String,
    selecting: bool,
    selection: SelectionState<ModelId<V>>,
    fx_speed: Duration,
    title: String,
    subtitle: String,
    content: Content,
    stage: Stage,
    indicator: Option<String>,
    scroll_position: usize,
    rendered_once: bool,
}

impl<V: ItemView> PanelState<V> {
    fn view_models(&self) -> Vec<Arc<V>> {
        self.views.iter().map(|e| e.view.clone()).collect()
    }

    fn empty_text(&self, settings: &PanelSettings) -> String {
        if !self.search_for.is_empty() || !self.filters.is_empty() {
            settings.none_found_message.clone()
        } else {
            settings.empty_message.clone()
        }
    }

    fn controls(&self, settings: &PanelSettings, actions: &[BulkAction<Model<V>>]) -> Controls {
        Controls {
            title: self.source.title().unwrap_or_else(|| self.title.clone()),
            subtitle: self.subtitle.clone(),
            search_query: self.search_for.clone(),
            search_placeholder: settings.search_placeholder.clone(),
            action_menu: actions.iter().map(|a| a.label().to_string()).collect(),
        }
    }
}

struct Inner<V: ItemView> {
    signals: PanelSignals<V>,
    settings: PanelSettings,
    driver: Arc<dyn FxDriver>,
    factory: ViewFactory<V>,
    actions: Vec<BulkAction<Model<V>>>,
    main_queue: StepQueue,
    error_logger: Mutex<Option<ConnectionGuard>>,
    state: Mutex<PanelState<V>>,
}

/// A filterable, searchable, multi-select list kept in sync with a
/// [`Collection`].
///
/// The panel owns one item view per visible entity. Collection updates that
/// add or remove a single entity patch the views in place; anything broader
/// rebuilds them. Logical state (views, selection, query, filters) changes
/// immediately. Visual effects are queued: insert and remove effects on the
/// view's own queue, full renders on the panel's queue.
///
/// `ListPanel` is a cheap handle; clones refer to the same panel.
///
/// # Example
///
/// ```ignore
/// use horizon_list::prelude::*;
///
/// let datasets = Arc::new(Collection::from_models(load_datasets()));
/// let panel = ListPanel::<ListItemView<Dataset>>::new(
///     PanelConfig::new().collection(datasets.clone()),
/// );
/// panel.signals().rendered.connect(|_| println!("rendered"));
/// panel.render(None);
///
/// datasets.add(Arc::new(new_dataset)); // inserts one view
/// panel.search_items("fastq", false);  // rebuilds the views
/// ```
pub struct ListPanel<V: ItemView> {
    inner: Arc<Inner<V>>,
}

impl<V: ItemView> Clone for ListPanel<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V: ItemView> ListPanel<V> {
    /// Create a panel. Selectors start visible unless the config says otherwise.
    pub fn new(config: PanelConfig<V>) -> Self {
        Self::build(config, true)
    }

    pub(crate) fn build(config: PanelConfig<V>, default_selecting: bool) -> Self {
        let PanelConfig {
            settings,
            collection,
            view_factory,
            filters,
            search_for,
            selected,
            fx_driver,
            actions,
            log_errors,
        } = config;

        let collection = collection.unwrap_or_else(Collection::empty);
        let factory: ViewFactory<V> = view_factory.unwrap_or_else(|| Arc::new(V::from_options));
        let selecting = settings.selecting.unwrap_or(default_selecting);

        let state = PanelState {
            source: Arc::new(StaticSource::new(collection.clone())),
            collection: collection.clone(),
            source_subs: Subscriptions::new(),
            views: Vec::new(),
            filters,
            search_for,
            selecting,
            selection: SelectionState::new(selected),
            fx_speed: settings.fx_speed(),
            title: settings.title.clone(),
            subtitle: settings.subtitle.clone(),
            content: Content::default(),
            stage: Stage::new(),
            indicator: None,
            scroll_position: 0,
            rendered_once: false,
        };

        let panel = Self {
            inner: Arc::new(Inner {
                signals: PanelSignals::default(),
                settings,
                driver: fx_driver,
                factory,
                actions,
                main_queue: StepQueue::new(),
                error_logger: Mutex::new(None),
                state: Mutex::new(state),
            }),
        };
        {
            let mut guard = panel.inner.state.lock();
            let st = &mut *guard;
            st.content = Content {
                controls: st.controls(&panel.inner.settings, &panel.inner.actions),
                items: Vec::new(),
                empty_message: st.empty_text(&panel.inner.settings),
            };
        }
        panel.set_up_listeners(log_errors);
        panel.bind_source(Arc::new(StaticSource::new(collection)));
        tracing::debug!(target: targets::PANEL, selecting, "list panel initialized");
        panel
    }

    fn downgrade(&self) -> Weak<Inner<V>> {
        Arc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<Inner<V>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    fn set_up_listeners(&self, log_errors: bool) {
        let signals = &self.inner.signals;
        if log_errors {
            let guard = signals.error.connect_scoped(|err: &ListError| {
                tracing::error!(target: targets::PANEL, error = %err, "list panel error");
            });
            *self.inner.error_logger.lock() = Some(guard);
        }

        let weak = self.downgrade();
        signals.loading.connect(move |_| {
            if let Some(panel) = Self::upgrade(&weak) {
                panel.show_loading_indicator(LOADING_MESSAGE, INDICATOR_FX);
            }
        });
        let weak = self.downgrade();
        signals.loading_done.connect(move |_| {
            if let Some(panel) = Self::upgrade(&weak) {
                panel.hide_loading_indicator(INDICATOR_FX);
            }
        });
        let weak = self.downgrade();
        signals.view_event.connect(move |(view, event)| {
            if let Some(panel) = Self::upgrade(&weak) {
                panel.handle_view_event(view, event);
            }
        });
    }

    /// Replace the default error logger with `handler`.
    ///
    /// Other connections to the `error` signal are left alone.
    pub fn set_error_handler<F>(&self, handler: F)
    where
        F: Fn(&ListError) + Send + Sync + 'static,
    {
        let guard = self.inner.signals.error.connect_scoped(handler);
        *self.inner.error_logger.lock() = Some(guard);
    }

    /// Render a different data source, detaching everything bound to the old one.
    ///
    /// Existing item views are freed; call [`render`](Self::render) or
    /// [`render_items`](Self::render_items) to build new ones.
    pub fn set_source(&self, source: Arc<dyn DataSource<Model<V>>>) {
        self.free_views();
        self.bind_source(source);
    }

    /// Render a different collection.
    pub fn set_collection(&self, collection: Arc<Collection<Model<V>>>) {
        self.set_source(Arc::new(StaticSource::new(collection)));
    }

    fn bind_source(&self, source: Arc<dyn DataSource<Model<V>>>) {
        let previous = std::mem::take(&mut self.inner.state.lock().source_subs);
        drop(previous);

        let collection = source.collection();
        let mut subs = Subscriptions::new();

        let weak = self.downgrade();
        let relay: ErrorRelay = Arc::new(move |err: &ListError| {
            if let Some(inner) = weak.upgrade() {
                inner.signals.error.emit(err.clone());
            }
        });
        let r = relay.clone();
        subs.listen(&collection.signals().error, move |err| r(err));

        let weak = self.downgrade();
        subs.listen(&collection.signals().update, move |delta| {
            if let Some(panel) = Self::upgrade(&weak) {
                panel.on_update(delta);
            }
        });
        let weak = self.downgrade();
        subs.listen(&collection.signals().reset, move |_| {
            if let Some(panel) = Self::upgrade(&weak) {
                panel.render_items();
            }
        });
        source.bind(&mut subs, relay);

        tracing::debug!(target: targets::PANEL, listeners = subs.len(), "bound collection");
        let mut st = self.inner.state.lock();
        st.source = source;
        st.collection = collection;
        st.source_subs = subs;
    }

    fn on_update(&self, delta: &UpdateDelta<Model<V>>) {
        tracing::trace!(target: targets::PANEL, ?delta, "collection update");
        match (delta.added.as_slice(), delta.removed.as_slice()) {
            ([added], []) => {
                self.add_item_view(added);
            }
            ([], [removed]) => {
                self.remove_item_view(removed);
            }
            _ if delta.total() > 1 => {
                self.render_items();
            }
            _ => {}
        }
    }

    fn handle_view_event(&self, view: &Arc<V>, event: &ItemViewEvent) {
        match event {
            ItemViewEvent::Selected { modifiers } => self.on_view_selected(view, *modifiers),
            ItemViewEvent::Deselected => {
                self.inner
                    .state
                    .lock()
                    .selection
                    .record_deselect(&view.model().id());
            }
            ItemViewEvent::DragStart if self.inner.settings.drag_items => {
                let selected = self.selected_entities();
                let models = if selected.is_empty() {
                    vec![view.model().clone()]
                } else {
                    selected
                };
                self.inner.signals.drag_start.emit(DragPayload { models });
            }
            ItemViewEvent::Error { message } => {
                self.inner.signals.error.emit(ListError::view(message.clone()));
            }
            _ => {}
        }
    }

    fn on_view_selected(&self, view: &Arc<V>, modifiers: KeyboardModifiers) {
        let (anchor, selecting) = {
            let st = self.inner.state.lock();
            (st.selection.last_selected().cloned(), st.selecting)
        };
        if modifiers.shift
            && let Some(anchor) = anchor
        {
            if let Some(anchor_view) = self.view_from_model_id(&anchor) {
                self.select_range(Some(view), Some(&anchor_view));
            }
        } else if modifiers.alt && !selecting {
            self.show_selectors(None);
        }
        let id = view.model().id();
        tracing::trace!(target: targets::SELECTION, ?id, "selected");
        self.inner.state.lock().selection.record_select(id);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Build fresh content and queue the swap: fade out, swap, fade in, then
    /// emit `rendered` (and `rendered_initial` the first time).
    ///
    /// Item views are rebuilt immediately; only the on-screen swap waits for
    /// the queue. `speed` defaults to the panel's effect speed.
    pub fn render(&self, speed: Option<Duration>) {
        tracing::debug!(target: targets::PANEL, "render");
        let (views, _) = self.rebuild_views();
        let controls = {
            let st = self.inner.state.lock();
            st.controls(&self.inner.settings, &self.inner.actions)
        };
        self.inner.signals.views_ready.emit(views);
        self.queue_new_render(controls, speed);
    }

    fn queue_new_render(&self, controls: Controls, speed: Option<Duration>) {
        let speed = speed.unwrap_or_else(|| self.fx_speed());
        let fade_out = self.clone();
        let swap = self.downgrade();
        let fade_in = self.clone();
        let announce = self.downgrade();
        self.inner.main_queue.enqueue([
            step(move |done| fade_out.play(FxTarget::Panel, Effect::FadeOut, speed, done)),
            step(move |done| {
                if let Some(panel) = Self::upgrade(&swap) {
                    panel.swap_new_render(controls);
                }
                done.finish();
            }),
            step(move |done| fade_in.play(FxTarget::Panel, Effect::FadeIn, speed, done)),
            step(move |done| {
                if let Some(panel) = Self::upgrade(&announce) {
                    panel.announce_rendered();
                }
                done.finish();
            }),
        ]);
    }

    /// Swap in the new controls along with the views alive right now.
    ///
    /// Views added or removed while the panel faded out are already reflected
    /// in the view list, so items are taken from it rather than from the
    /// views built by `render`.
    fn swap_new_render(&self, controls: Controls) {
        let selecting = {
            let mut guard = self.inner.state.lock();
            let st = &mut *guard;
            let items: Vec<ViewKey> = st.views.iter().map(|e| e.key).collect();
            for key in &items {
                st.stage.set_shown(FxTarget::Item(*key), true);
            }
            st.stage.set_shown(FxTarget::EmptyMessage, items.is_empty());
            st.content = Content {
                controls,
                items,
                empty_message: st.empty_text(&self.inner.settings),
            };
            st.selecting
        };
        tracing::trace!(target: targets::PANEL, "swapped in new render");
        if selecting {
            self.show_selectors(Some(Duration::ZERO));
        }
    }

    fn announce_rendered(&self) {
        let first = {
            let mut st = self.inner.state.lock();
            !std::mem::replace(&mut st.rendered_once, true)
        };
        self.inner.signals.rendered.emit(());
        if first {
            self.inner.signals.rendered_initial.emit(());
        }
    }

    /// Rebuild the item views in place, without the fade/swap queue.
    ///
    /// Frees every view, recomputes the view-sequence, renders one view per
    /// entity and toggles the empty message. Emits `views_ready`.
    pub fn render_items(&self) -> Vec<Arc<V>> {
        let (views, keys) = self.rebuild_views();
        let empty_visible = views.is_empty();
        {
            let mut st = self.inner.state.lock();
            for key in &keys {
                st.stage.set_shown(FxTarget::Item(*key), true);
            }
            st.stage.set_shown(FxTarget::EmptyMessage, empty_visible);
            st.content.items = keys;
            let empty_message = st.empty_text(&self.inner.settings);
            st.content.empty_message = empty_message;
        }
        tracing::debug!(target: targets::PANEL, count = views.len(), "rendered items");
        self.inner.signals.views_ready.emit(views.clone());
        views
    }

    /// Free the views, then create and render one per visible entity.
    fn rebuild_views(&self) -> (Vec<Arc<V>>, Vec<ViewKey>) {
        self.free_views();
        let visible = {
            let st = self.inner.state.lock();
            compute_visible(&st.collection, &st.filters, &st.search_for)
        };
        let entries: Vec<ViewEntry<V>> = visible
            .into_iter()
            .map(|model| self.create_item_view(model))
            .collect();
        for entry in &entries {
            entry.view.render(Duration::ZERO);
        }
        let views: Vec<Arc<V>> = entries.iter().map(|e| e.view.clone()).collect();
        let keys: Vec<ViewKey> = entries.iter().map(|e| e.key).collect();
        self.inner.state.lock().views = entries;
        (views, keys)
    }

    fn create_item_view(&self, model: Arc<Model<V>>) -> ViewEntry<V> {
        let options = {
            let st = self.inner.state.lock();
            ItemViewOptions {
                selected: st.selection.contains(&model.id()),
                model,
                fx_speed: st.fx_speed,
                expanded: false,
                selectable: st.selecting,
                draggable: self.inner.settings.drag_items,
            }
        };
        let view = Arc::new((self.inner.factory)(options));

        let mut subs = Subscriptions::new();
        let weak_panel = self.downgrade();
        let weak_view = Arc::downgrade(&view);
        subs.listen(view.events(), move |event| {
            if let (Some(inner), Some(view)) = (weak_panel.upgrade(), weak_view.upgrade()) {
                inner.signals.view_event.emit((view, event.clone()));
            }
        });

        ViewEntry {
            key: ViewKey::next(),
            view,
            subs,
            queue: StepQueue::new(),
        }
    }

    /// Detach from and drop every item view.
    pub fn free_views(&self) {
        let freed = {
            let mut st = self.inner.state.lock();
            let freed = std::mem::take(&mut st.views);
            for entry in &freed {
                st.stage.forget(FxTarget::Item(entry.key));
            }
            freed
        };
        if !freed.is_empty() {
            tracing::trace!(target: targets::PANEL, count = freed.len(), "freed views");
        }
    }

    /// Insert a view for `model` at its place in the view-sequence.
    ///
    /// Returns `None` when `model` is filtered out or not in the collection.
    /// The view joins the panel's views at once; its enter effect is queued
    /// behind the empty message fading out, if it was showing.
    pub fn add_item_view(&self, model: &Arc<Model<V>>) -> Option<Arc<V>> {
        let index = {
            let st = self.inner.state.lock();
            compute_visible(&st.collection, &st.filters, &st.search_for)
                .iter()
                .position(|m| Arc::ptr_eq(m, model))
        };
        let Some(index) = index else {
            tracing::trace!(target: targets::PANEL, id = ?model.id(), "added entity not visible");
            return None;
        };

        let entry = self.create_item_view(model.clone());
        let (key, view, queue) = (entry.key, entry.view.clone(), entry.queue.clone());
        {
            let mut st = self.inner.state.lock();
            let at = index.min(st.views.len());
            st.views.insert(at, entry);
        }
        tracing::debug!(target: targets::PANEL, id = ?model.id(), index, "adding view");

        let speed = self.fx_speed();
        let hide_empty = self.clone();
        let attach = self.clone();
        queue.enqueue([
            step(move |done| {
                if hide_empty.is_shown(FxTarget::EmptyMessage) {
                    hide_empty.play(FxTarget::EmptyMessage, Effect::FadeOut, speed, done);
                } else {
                    done.finish();
                }
            }),
            step(move |done| attach.attach_view(key, speed, done)),
        ]);
        Some(view)
    }

    fn attach_view(&self, key: ViewKey, speed: Duration, done: Done) {
        let view = {
            let mut st = self.inner.state.lock();
            let index = st.views.iter().position(|e| e.key == key);
            let Some(index) = index else {
                drop(st);
                done.finish();
                return;
            };
            let view = st.views[index].view.clone();
            // A full render swapped in since the view was added already
            // placed it.
            if !st.content.items.contains(&key) {
                let at = st.views[..index]
                    .iter()
                    .filter(|e| st.content.items.contains(&e.key))
                    .count();
                st.content.items.insert(at, key);
            }
            view
        };
        view.render(Duration::ZERO);
        self.inner.signals.view_attached.emit(view.clone());
        let weak = self.downgrade();
        let done = done.after(move || {
            if let Some(inner) = weak.upgrade() {
                inner.signals.view_attached_rendered.emit(view);
            }
        });
        self.play(FxTarget::Item(key), Effect::SlideDown, speed, done);
    }

    /// Take out the view bound to `model` (matched by identity).
    ///
    /// Returns `None` when no view renders `model`. The view leaves the
    /// panel's views at once; its exit effect, teardown and (if it was the
    /// last one) the empty message are queued.
    pub fn remove_item_view(&self, model: &Arc<Model<V>>) -> Option<Arc<V>> {
        let entry = {
            let mut st = self.inner.state.lock();
            let index = st
                .views
                .iter()
                .position(|e| Arc::ptr_eq(e.view.model(), model))?;
            st.views.remove(index)
        };
        let ViewEntry {
            key,
            view,
            subs,
            queue,
        } = entry;
        tracing::debug!(target: targets::PANEL, id = ?model.id(), "removing view");
        self.inner.signals.view_removed.emit(view.clone());

        let speed = self.fx_speed();
        let fade = self.clone();
        let teardown = self.clone();
        let removed = view.clone();
        queue.enqueue([
            step(move |done| fade.play(FxTarget::Item(key), Effect::FadeOut, speed, done)),
            step(move |done| {
                removed.remove();
                drop(subs);
                let now_empty = {
                    let mut st = teardown.inner.state.lock();
                    st.content.items.retain(|k| *k != key);
                    st.stage.forget(FxTarget::Item(key));
                    let now_empty = st.views.is_empty();
                    if now_empty {
                        let empty_message = st.empty_text(&teardown.inner.settings);
                        st.content.empty_message = empty_message;
                    }
                    now_empty
                };
                teardown.inner.signals.view_removed_rendered.emit(removed);
                if now_empty {
                    teardown.play(FxTarget::EmptyMessage, Effect::FadeIn, speed, done);
                } else {
                    done.finish();
                }
            }),
        ]);
        Some(view)
    }

    /// Play `effect` and record the target's visibility.
    ///
    /// Showing effects mark the target visible when they start, hiding
    /// effects mark it hidden when they end.
    fn play(&self, target: FxTarget, effect: Effect, speed: Duration, done: Done) {
        let done = match effect.ends_shown() {
            Some(true) => {
                self.inner.state.lock().stage.set_shown(target, true);
                done
            }
            Some(false) => {
                let weak = self.downgrade();
                done.after(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.state.lock().stage.set_shown(target, false);
                    }
                })
            }
            None => done,
        };
        self.inner.driver.play(target, effect, speed, done);
    }

    // =========================================================================
    // Search and filters
    // =========================================================================

    /// Apply `query` and rebuild the views, emitting `search_searching`.
    ///
    /// Does nothing when `query` is the current query, unless `force` is set.
    /// Returns whether the views were rebuilt.
    pub fn search_items(&self, query: &str, force: bool) -> bool {
        {
            let mut st = self.inner.state.lock();
            if !force && st.search_for == query {
                return false;
            }
            st.search_for = query.to_string();
            st.content.controls.search_query = query.to_string();
        }
        tracing::debug!(target: targets::PANEL, query, "searching");
        self.render_items();
        self.inner.signals.search_searching.emit(query.to_string());
        true
    }

    /// Clear the query, emit `search_clear` and rebuild the views.
    pub fn clear_search(&self) {
        {
            let mut st = self.inner.state.lock();
            st.search_for.clear();
            st.content.controls.search_query.clear();
        }
        self.inner.signals.search_clear.emit(());
        self.render_items();
    }

    /// The current query.
    pub fn search_for(&self) -> String {
        self.inner.state.lock().search_for.clone()
    }

    /// Replace the filter set and rebuild the views.
    pub fn set_filters(&self, filters: Vec<Filter<Model<V>>>) {
        self.inner.state.lock().filters = filters;
        self.render_items();
    }

    /// Add a filter and rebuild the views.
    pub fn add_filter<F>(&self, predicate: F)
    where
        F: Fn(&Model<V>) -> bool + Send + Sync + 'static,
    {
        self.inner.state.lock().filters.push(Arc::new(predicate));
        self.render_items();
    }

    /// Drop every filter and rebuild the views.
    pub fn clear_filters(&self) {
        self.inner.state.lock().filters.clear();
        self.render_items();
    }

    /// Number of active filters.
    pub fn filter_count(&self) -> usize {
        self.inner.state.lock().filters.len()
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Live item views, in rendered order.
    pub fn views(&self) -> Vec<Arc<V>> {
        self.inner.state.lock().view_models()
    }

    /// The view rendering the entity with `id`.
    pub fn view_from_model_id(&self, id: &ModelId<V>) -> Option<Arc<V>> {
        self.inner
            .state
            .lock()
            .views
            .iter()
            .find(|e| e.view.model().id() == *id)
            .map(|e| e.view.clone())
    }

    /// The view rendering an entity with the same id as `model`.
    pub fn view_from_model(&self, model: &Model<V>) -> Option<Arc<V>> {
        self.view_from_model_id(&model.id())
    }

    /// Views whose entity satisfies `predicate`, in rendered order.
    pub fn views_where<P>(&self, predicate: P) -> Vec<Arc<V>>
    where
        P: Fn(&Model<V>) -> bool,
    {
        self.views()
            .into_iter()
            .filter(|v| predicate(v.model()))
            .collect()
    }

    /// Views from `from` to `to` inclusive; see [`view_range`].
    pub fn view_range(&self, from: Option<&Arc<V>>, to: Option<&Arc<V>>) -> Vec<Arc<V>> {
        view_range(&self.views(), from, to)
    }

    /// Expand every view.
    pub fn expand_all(&self) {
        self.views().iter().for_each(|v| v.expand());
    }

    /// Collapse every view.
    pub fn collapse_all(&self) {
        self.views().iter().for_each(|v| v.collapse());
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select every view.
    pub fn select_all(&self, modifiers: KeyboardModifiers) {
        self.views().iter().for_each(|v| v.select(modifiers));
    }

    /// Deselect every view and drop the range anchor.
    pub fn deselect_all(&self) {
        self.inner.state.lock().selection.clear_anchor();
        self.views().iter().for_each(|v| v.deselect());
    }

    /// Select every view from `from` to `to` inclusive. Returns them.
    pub fn select_range(&self, from: Option<&Arc<V>>, to: Option<&Arc<V>>) -> Vec<Arc<V>> {
        let range = self.view_range(from, to);
        tracing::trace!(target: targets::SELECTION, count = range.len(), "selecting range");
        range.iter().for_each(|v| v.select(KeyboardModifiers::NONE));
        range
    }

    /// Selected views, in rendered order.
    pub fn selected_views(&self) -> Vec<Arc<V>> {
        self.views().into_iter().filter(|v| v.is_selected()).collect()
    }

    fn selected_entities(&self) -> Vec<Arc<Model<V>>> {
        self.selected_views()
            .iter()
            .map(|v| v.model().clone())
            .collect()
    }

    /// Entities of the selected views, in rendered order, as a new collection
    /// ordered like the backing one.
    pub fn selected_models(&self) -> Collection<Model<V>> {
        let models = self.selected_entities();
        self.collection().derive(models)
    }

    /// Selected ids, without repeats. Ids whose view is gone are kept.
    pub fn selected_ids(&self) -> Vec<ModelId<V>> {
        self.inner.state.lock().selection.unique()
    }

    /// The range anchor.
    pub fn last_selected(&self) -> Option<ModelId<V>> {
        self.inner.state.lock().selection.last_selected().cloned()
    }

    /// Whether selectors are visible.
    pub fn is_selecting(&self) -> bool {
        self.inner.state.lock().selecting
    }

    /// Reveal the selectors. Views skip their effect on large lists.
    pub fn show_selectors(&self, speed: Option<Duration>) {
        let (views, speed) = {
            let mut st = self.inner.state.lock();
            st.selecting = true;
            (st.view_models(), speed.unwrap_or(st.fx_speed))
        };
        self.play(FxTarget::ListActions, Effect::SlideDown, speed, Done::noop());
        let per_view = self.selector_speed(views.len(), speed);
        views.iter().for_each(|v| v.show_selector(per_view));
    }

    /// Hide the selectors, forgetting the selection and the range anchor.
    pub fn hide_selectors(&self, speed: Option<Duration>) {
        let (views, speed) = {
            let mut st = self.inner.state.lock();
            st.selecting = false;
            (st.view_models(), speed.unwrap_or(st.fx_speed))
        };
        self.play(FxTarget::ListActions, Effect::SlideUp, speed, Done::noop());
        let per_view = self.selector_speed(views.len(), speed);
        views.iter().for_each(|v| v.hide_selector(per_view));
        self.inner.state.lock().selection.clear();
    }

    /// Show the selectors if hidden, hide them if shown.
    pub fn toggle_selectors(&self) {
        if self.is_selecting() {
            self.hide_selectors(None);
        } else {
            self.show_selectors(None);
        }
    }

    fn selector_speed(&self, count: usize, speed: Duration) -> Duration {
        if count >= self.inner.settings.throttle_selector_fx_at {
            Duration::ZERO
        } else {
            speed
        }
    }

    // =========================================================================
    // Bulk actions
    // =========================================================================

    /// Labels of the configured bulk actions.
    pub fn multiselect_actions(&self) -> Vec<String> {
        self.inner
            .actions
            .iter()
            .map(|a| a.label().to_string())
            .collect()
    }

    /// Run the bulk action labelled `label` on the selected entities.
    pub fn run_action(&self, label: &str) -> Result<()> {
        let action = self
            .inner
            .actions
            .iter()
            .find(|a| a.label() == label)
            .ok_or_else(|| ListError::UnknownAction {
                label: label.to_string(),
            })?;
        action.invoke(&self.selected_entities());
        Ok(())
    }

    // =========================================================================
    // Loading indicator
    // =========================================================================

    fn show_loading_indicator(&self, message: &str, speed: Duration) {
        let panel_shown = {
            let mut st = self.inner.state.lock();
            st.indicator = Some(message.to_string());
            st.stage.is_shown(FxTarget::Panel)
        };
        if panel_shown {
            self.play(FxTarget::Panel, Effect::FadeOut, speed, Done::noop());
            self.play(FxTarget::Indicator, Effect::FadeIn, speed, Done::noop());
        } else {
            self.play(FxTarget::Indicator, Effect::FadeIn, Duration::ZERO, Done::noop());
        }
    }

    fn hide_loading_indicator(&self, speed: Duration) {
        let weak = self.downgrade();
        let done = Done::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.state.lock().indicator = None;
            }
        });
        self.play(FxTarget::Indicator, Effect::FadeOut, speed, done);
    }

    /// Message of the loading indicator while it is up.
    pub fn indicator(&self) -> Option<String> {
        self.inner.state.lock().indicator.clone()
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Row the scroll container is scrolled to.
    pub fn scroll_position(&self) -> usize {
        self.inner.state.lock().scroll_position
    }

    /// Scroll to row `position`. `speed` defaults to an instant jump.
    pub fn scroll_to(&self, position: usize, speed: Option<Duration>) {
        let weak = self.downgrade();
        let done = Done::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.state.lock().scroll_position = position;
            }
        });
        self.play(
            FxTarget::ScrollContainer,
            Effect::ScrollTo(position),
            speed.unwrap_or(Duration::ZERO),
            done,
        );
    }

    /// Scroll to the first row.
    pub fn scroll_to_top(&self, speed: Option<Duration>) {
        self.scroll_to(0, speed);
    }

    /// Scroll to the view rendering `id`. Returns `false` if none does.
    pub fn scroll_to_id(&self, id: &ModelId<V>, speed: Option<Duration>) -> bool {
        let row = self
            .inner
            .state
            .lock()
            .views
            .iter()
            .position(|e| e.view.model().id() == *id);
        match row {
            Some(row) => {
                self.scroll_to(row, speed);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The panel's signals.
    pub fn signals(&self) -> &PanelSignals<V> {
        &self.inner.signals
    }

    /// The panel's settings as configured.
    pub fn settings(&self) -> &PanelSettings {
        &self.inner.settings
    }

    /// The backing collection.
    pub fn collection(&self) -> Arc<Collection<Model<V>>> {
        self.inner.state.lock().collection.clone()
    }

    /// Snapshot of what is on screen.
    pub fn content(&self) -> Content {
        self.inner.state.lock().content.clone()
    }

    /// Whether `target` is visible.
    pub fn is_shown(&self, target: FxTarget) -> bool {
        self.inner.state.lock().stage.is_shown(target)
    }

    /// Key of the live view rendering `id`, for matching against
    /// [`Content::items`] and [`FxTarget::Item`].
    pub fn view_key(&self, id: &ModelId<V>) -> Option<ViewKey> {
        self.inner
            .state
            .lock()
            .views
            .iter()
            .find(|e| e.view.model().id() == *id)
            .map(|e| e.key)
    }

    /// Duration of panel effects.
    pub fn fx_speed(&self) -> Duration {
        self.inner.state.lock().fx_speed
    }

    /// Change the duration of panel effects.
    pub fn set_fx_speed(&self, speed: Duration) {
        self.inner.state.lock().fx_speed = speed;
    }

    /// Change the title.
    pub fn set_title(&self, title: impl Into<String>) {
        let mut st = self.inner.state.lock();
        st.title = title.into();
        let shown = st.source.title().unwrap_or_else(|| st.title.clone());
        st.content.controls.title = shown;
    }

    /// Change the subtitle.
    pub fn set_subtitle(&self, subtitle: impl Into<String>) {
        let mut st = self.inner.state.lock();
        st.subtitle = subtitle.into();
        let shown = st.subtitle.clone();
        st.content.controls.subtitle = shown;
    }

    /// Whether the main render queue is busy.
    pub fn is_rendering(&self) -> bool {
        self.inner.main_queue.is_running()
    }

    /// Number of listeners attached to the data source and its collection.
    pub fn source_listener_count(&self) -> usize {
        self.inner.state.lock().source_subs.len()
    }
}

impl<V: ItemView> std::fmt::Debug for ListPanel<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.inner.state.lock();
        f.debug_struct("ListPanel")
            .field("collection", &st.collection)
            .field("views", &st.views.len())
            .field("search_for", &st.search_for)
            .field("selecting", &st.selecting)
            .finish_non_exhaustive()
    }
}
