//! Integration tests for `ListPanel`.

use std::sync::Arc;
use std::time::Duration;

use horizon_list::fx::FxTarget;
use horizon_list::model::compute_visible;
use horizon_list::prelude::*;
use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Item {
    id: u32,
    name: String,
    state: String,
}

impl Entity for Item {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn search_fields(&self) -> Vec<SearchField> {
        vec![
            SearchField::new("name", &self.name),
            SearchField::new("state", &self.state),
        ]
    }
}

fn item(id: u32, name: &str) -> Arc<Item> {
    Arc::new(Item {
        id,
        name: name.to_string(),
        state: "ok".to_string(),
    })
}

type View = ListItemView<Item>;
type Panel = ListPanel<View>;

fn rendered(models: Vec<Arc<Item>>) -> (Panel, Arc<Collection<Item>>) {
    let collection = Arc::new(Collection::from_models(models));
    let panel = Panel::new(PanelConfig::new().collection(collection.clone()));
    panel.render(None);
    (panel, collection)
}

fn ids(views: &[Arc<View>]) -> Vec<u32> {
    views.iter().map(|v| v.model().id).collect()
}

fn counter<A: Clone + Send + 'static>(signal: &Signal<A>) -> Arc<Mutex<usize>> {
    let count = Arc::new(Mutex::new(0));
    let c = count.clone();
    signal.connect(move |_| *c.lock() += 1);
    count
}

// =========================================================================
// Incremental rendering
// =========================================================================

#[test]
fn test_single_add_keeps_existing_views() {
    let (panel, collection) = rendered(vec![item(1, "a"), item(2, "b"), item(4, "d")]);
    let before = panel.views();

    collection.add_at(2, item(3, "c"));

    let after = panel.views();
    assert_eq!(ids(&after), vec![1, 2, 3, 4]);
    assert!(Arc::ptr_eq(&before[0], &after[0]));
    assert!(Arc::ptr_eq(&before[1], &after[1]));
    assert!(Arc::ptr_eq(&before[2], &after[3]));
    assert_eq!(panel.content().items.len(), 4);
}

#[test]
fn test_single_add_of_filtered_entity_is_ignored() {
    let collection = Arc::new(Collection::from_models(vec![item(1, "keep")]));
    let panel = Panel::new(
        PanelConfig::new()
            .collection(collection.clone())
            .filter(|i: &Item| i.name != "hidden"),
    );
    panel.render(None);
    let attached = counter(&panel.signals().view_attached);

    collection.add(item(2, "hidden"));
    assert_eq!(ids(&panel.views()), vec![1]);
    assert_eq!(*attached.lock(), 0);
    assert!(panel.add_item_view(&item(3, "stranger")).is_none());
}

#[test]
fn test_single_remove_destroys_one_view() {
    let (panel, collection) = rendered(vec![item(1, "a"), item(2, "b"), item(3, "c")]);
    let before = panel.views();
    let removed = counter(&panel.signals().view_removed_rendered);

    collection.remove(&2);

    let after = panel.views();
    assert_eq!(ids(&after), vec![1, 3]);
    assert!(Arc::ptr_eq(&before[0], &after[0]));
    assert!(Arc::ptr_eq(&before[2], &after[1]));
    assert!(before[1].is_removed());
    assert_eq!(*removed.lock(), 1);
    assert_eq!(before[1].events().connection_count(), 0);
}

#[test]
fn test_remove_without_view_is_noop() {
    let (panel, _) = rendered(vec![item(1, "a")]);
    assert!(panel.remove_item_view(&item(1, "a")).is_none());
    assert_eq!(panel.views().len(), 1);
}

#[test]
fn test_bulk_change_rebuilds_like_compute_visible() {
    let (panel, collection) = rendered(vec![item(1, "alpha"), item(2, "beta")]);
    panel.search_items("a", false);
    let ready = counter(&panel.signals().views_ready);

    collection.add_all(vec![item(3, "gamma"), item(4, "xyz")]);
    collection.remove_all(&[1, 4]);

    let expected = compute_visible(&collection, &[], "a");
    let expected: Vec<u32> = expected.iter().map(|m| m.id).collect();
    assert_eq!(ids(&panel.views()), expected);
    assert_eq!(ids(&panel.views()), vec![2, 3]);
    assert_eq!(*ready.lock(), 2);
}

#[test]
fn test_reset_rebuilds() {
    let (panel, collection) = rendered(vec![item(1, "a")]);
    collection.reset(vec![item(7, "g")]);
    assert_eq!(ids(&panel.views()), vec![7]);
}

#[test]
fn test_removing_last_view_shows_empty_message() {
    let (panel, collection) = rendered(vec![item(1, "a")]);
    assert!(!panel.is_shown(FxTarget::EmptyMessage));
    collection.remove(&1);
    assert!(panel.is_shown(FxTarget::EmptyMessage));
    assert_eq!(panel.content().empty_message, "This list is empty");
}

// =========================================================================
// Render lifecycle
// =========================================================================

#[test]
fn test_rendered_initial_fires_once() {
    let collection = Arc::new(Collection::from_models(vec![item(1, "a")]));
    let panel = Panel::new(PanelConfig::new().collection(collection));
    let rendered = counter(&panel.signals().rendered);
    let initial = counter(&panel.signals().rendered_initial);

    panel.render(None);
    panel.render(None);

    assert_eq!(*rendered.lock(), 2);
    assert_eq!(*initial.lock(), 1);
}

#[test]
fn test_render_swaps_while_hidden() {
    let animator = Arc::new(Animator::new());
    let collection = Arc::new(Collection::from_models(vec![item(1, "a")]));
    let panel = Panel::new(
        PanelConfig::new()
            .collection(collection)
            .fx_driver(animator.clone()),
    );
    let rendered = counter(&panel.signals().rendered);

    panel.render(None);
    assert_eq!(panel.views().len(), 1);
    assert!(panel.content().items.is_empty());
    assert!(animator.is_animating(FxTarget::Panel));

    animator.advance(Duration::from_millis(200));
    assert!(!panel.is_shown(FxTarget::Panel) || animator.is_animating(FxTarget::Panel));
    assert_eq!(panel.content().items.len(), 1);
    assert_eq!(*rendered.lock(), 0);

    animator.advance(Duration::from_millis(200));
    assert!(panel.is_shown(FxTarget::Panel));
    assert_eq!(*rendered.lock(), 1);
    assert!(!panel.is_rendering());
}

#[test]
fn test_insert_effects_are_queued_per_view() {
    let animator = Arc::new(Animator::new());
    let collection = Arc::new(Collection::new());
    let panel = Panel::new(
        PanelConfig::new()
            .collection(collection.clone())
            .fx_driver(animator.clone()),
    );
    panel.render(Some(Duration::ZERO));
    assert!(panel.is_shown(FxTarget::EmptyMessage));
    let attached = counter(&panel.signals().view_attached);
    let attached_rendered = counter(&panel.signals().view_attached_rendered);

    collection.add(item(1, "a"));
    assert_eq!(panel.views().len(), 1);
    assert!(panel.content().items.is_empty());
    assert!(animator.is_animating(FxTarget::EmptyMessage));

    animator.advance(Duration::from_millis(200));
    assert!(!panel.is_shown(FxTarget::EmptyMessage));
    assert_eq!(panel.content().items.len(), 1);
    assert_eq!(*attached.lock(), 1);
    assert_eq!(*attached_rendered.lock(), 0);

    animator.run_until_idle();
    assert_eq!(*attached_rendered.lock(), 1);
}

#[test]
fn test_add_during_render_fade_reaches_content() {
    let animator = Arc::new(Animator::new());
    let collection = Arc::new(Collection::from_models(vec![item(1, "a")]));
    let panel = Panel::new(
        PanelConfig::new()
            .collection(collection.clone())
            .fx_driver(animator.clone()),
    );

    panel.render(None);
    collection.add(item(2, "b"));
    animator.run_until_idle();

    let expected: Vec<_> = [1, 2].iter().filter_map(|id| panel.view_key(id)).collect();
    assert_eq!(expected.len(), 2);
    assert_eq!(panel.content().items, expected);
}

#[test]
fn test_attach_after_render_swap_is_not_duplicated() {
    let animator = Arc::new(Animator::new());
    let collection = Arc::new(Collection::new());
    let panel = Panel::new(
        PanelConfig::new()
            .collection(collection.clone())
            .fx_driver(animator.clone()),
    );
    panel.render(Some(Duration::ZERO));
    let attached = counter(&panel.signals().view_attached);
    let attached_rendered = counter(&panel.signals().view_attached_rendered);

    panel.render(None);
    collection.add(item(1, "a"));
    animator.run_until_idle();

    assert_eq!(panel.content().items, vec![panel.view_key(&1).unwrap()]);
    assert!(!panel.is_shown(FxTarget::EmptyMessage));
    assert_eq!(*attached.lock(), 1);
    assert_eq!(*attached_rendered.lock(), 1);
}

// =========================================================================
// Selection
// =========================================================================

#[test]
fn test_select_all_and_deselect_all() {
    let (panel, _) = rendered(vec![item(1, "a"), item(2, "b"), item(3, "c")]);

    panel.select_all(KeyboardModifiers::NONE);
    assert_eq!(ids(&panel.selected_views()), vec![1, 2, 3]);
    assert_eq!(panel.selected_models().len(), 3);

    panel.deselect_all();
    assert!(panel.selected_views().is_empty());
    assert!(panel.selected_ids().is_empty());
    assert_eq!(panel.last_selected(), None);
}

#[test]
fn test_shift_select_range() {
    let (panel, _) = rendered(vec![item(1, "a"), item(2, "b"), item(3, "c"), item(4, "d")]);
    let views = panel.views();

    views[0].select(KeyboardModifiers::NONE);
    views[3].select(KeyboardModifiers::SHIFT);

    assert_eq!(ids(&panel.selected_views()), vec![1, 2, 3, 4]);
    assert_eq!(panel.last_selected(), Some(4));
}

#[test]
fn test_shift_select_backwards() {
    let (panel, _) = rendered(vec![item(1, "a"), item(2, "b"), item(3, "c"), item(4, "d")]);
    let views = panel.views();

    views[2].select(KeyboardModifiers::NONE);
    views[0].select(KeyboardModifiers::SHIFT);

    assert_eq!(ids(&panel.selected_views()), vec![1, 2, 3]);
}

#[test]
fn test_shift_select_same_view() {
    let (panel, _) = rendered(vec![item(1, "a"), item(2, "b")]);
    let views = panel.views();

    views[1].select(KeyboardModifiers::NONE);
    views[1].deselect();
    views[1].select(KeyboardModifiers::SHIFT);

    assert_eq!(ids(&panel.selected_views()), vec![2]);
}

#[test]
fn test_shift_select_with_stale_anchor() {
    let (panel, collection) = rendered(vec![item(1, "a"), item(2, "b"), item(3, "c")]);
    panel.views()[0].select(KeyboardModifiers::NONE);
    collection.remove(&1);

    panel.views()[1].select(KeyboardModifiers::SHIFT);

    assert_eq!(ids(&panel.selected_views()), vec![3]);
    assert!(panel.selected_ids().contains(&1));
}

#[test]
fn test_alt_select_reveals_selectors() {
    let collection = Arc::new(Collection::from_models(vec![item(1, "a")]));
    let panel = Panel::new(PanelConfig::new().collection(collection).selecting(false));
    panel.render(None);
    assert!(!panel.is_selecting());

    panel.views()[0].select(KeyboardModifiers::ALT);
    assert!(panel.is_selecting());
    assert!(panel.views()[0].selector_shown());
    assert_eq!(panel.selected_ids(), vec![1]);
}

#[test]
fn test_hide_selectors_clears_selection() {
    let (panel, _) = rendered(vec![item(1, "a"), item(2, "b")]);
    panel.select_all(KeyboardModifiers::NONE);

    panel.toggle_selectors();

    assert!(!panel.is_selecting());
    assert!(panel.selected_ids().is_empty());
    assert_eq!(panel.last_selected(), None);
    assert!(panel.selected_views().is_empty());
}

#[test]
fn test_selector_effects_throttled_on_large_lists() {
    let collection = Arc::new(Collection::from_models(vec![item(1, "a"), item(2, "b")]));
    let panel = Panel::new(
        PanelConfig::new()
            .collection(collection)
            .selecting(false)
            .throttle_selector_fx_at(2),
    );
    panel.render(None);

    panel.show_selectors(Some(Duration::from_millis(300)));
    assert_eq!(panel.views()[0].last_speed(), Some(Duration::ZERO));

    panel.hide_selectors(None);
    panel.remove_item_view(&panel.views()[1].model().clone());
    panel.show_selectors(Some(Duration::from_millis(300)));
    assert_eq!(
        panel.views()[0].last_speed(),
        Some(Duration::from_millis(300))
    );
}

#[test]
fn test_initial_selection_is_applied() {
    let collection = Arc::new(Collection::from_models(vec![item(1, "a"), item(2, "b")]));
    let panel = Panel::new(PanelConfig::new().collection(collection).selected(vec![2]));
    panel.render(None);
    assert_eq!(ids(&panel.selected_views()), vec![2]);
}

// =========================================================================
// Search and filters
// =========================================================================

#[test]
fn test_search_no_ops() {
    let (panel, _) = rendered(vec![item(1, "alpha"), item(2, "beta")]);
    let ready = counter(&panel.signals().views_ready);
    let searching = counter(&panel.signals().search_searching);

    assert!(!panel.search_items("", false));
    assert_eq!(*ready.lock(), 0);

    assert!(panel.search_items("alpha", false));
    assert!(!panel.search_items("alpha", false));
    assert!(panel.search_items("alpha", true));
    assert_eq!(*ready.lock(), 2);
    assert_eq!(*searching.lock(), 2);
    assert_eq!(ids(&panel.views()), vec![1]);
}

#[test]
fn test_keyed_search_terms() {
    let collection = Arc::new(Collection::from_models(vec![
        item(1, "reads"),
        Arc::new(Item {
            id: 2,
            name: "reads".to_string(),
            state: "error".to_string(),
        }),
    ]));
    let panel = Panel::new(PanelConfig::new().collection(collection));
    panel.render(None);

    panel.search_items("reads state=error", false);
    assert_eq!(ids(&panel.views()), vec![2]);
}

#[test]
fn test_clear_search() {
    let (panel, _) = rendered(vec![item(1, "alpha"), item(2, "beta")]);
    let cleared = counter(&panel.signals().search_clear);
    panel.search_items("beta", false);

    panel.clear_search();

    assert_eq!(panel.search_for(), "");
    assert_eq!(ids(&panel.views()), vec![1, 2]);
    assert_eq!(*cleared.lock(), 1);
}

#[test]
fn test_filters_and_empty_messages() {
    let (panel, _) = rendered(vec![item(1, "alpha"), item(2, "beta")]);

    panel.add_filter(|i: &Item| i.name.starts_with('z'));
    assert!(panel.views().is_empty());
    assert!(panel.is_shown(FxTarget::EmptyMessage));
    assert_eq!(panel.content().empty_message, "No matching items found");

    panel.clear_filters();
    assert_eq!(panel.views().len(), 2);
    assert!(!panel.is_shown(FxTarget::EmptyMessage));
}

#[test]
fn test_empty_collection_message() {
    let (panel, _) = rendered(Vec::new());
    assert_eq!(panel.content().empty_message, "This list is empty");
    assert!(panel.is_shown(FxTarget::EmptyMessage));
}

#[test]
fn test_empty_collection_with_query_message() {
    let collection = Arc::new(Collection::<Item>::new());
    let panel = Panel::new(PanelConfig::new().collection(collection).search_for("x"));
    panel.render(None);
    assert!(panel.is_shown(FxTarget::EmptyMessage));
    assert_eq!(panel.content().empty_message, "No matching items found");
}

// =========================================================================
// Events, errors, actions
// =========================================================================

#[test]
fn test_view_events_are_forwarded() {
    let (panel, _) = rendered(vec![item(1, "a")]);
    let names = Arc::new(Mutex::new(Vec::new()));
    let n = names.clone();
    panel
        .signals()
        .view_event
        .connect(move |(_, event)| n.lock().push(event.forwarded_name()));

    panel.expand_all();
    panel.collapse_all();

    assert_eq!(*names.lock(), vec!["view:expanded", "view:collapsed"]);
}

#[test]
fn test_errors_are_relayed() {
    let collection = Arc::new(Collection::from_models(vec![item(1, "a")]));
    let panel = Panel::new(
        PanelConfig::new()
            .collection(collection.clone())
            .log_errors(false),
    );
    panel.render(None);
    let errors = Arc::new(Mutex::new(Vec::new()));
    let e = errors.clone();
    panel.signals().error.connect(move |err| e.lock().push(err.clone()));

    collection.report_error(ListError::collection("fetch failed"));
    panel.views()[0].report_error("bad row");

    let errors = errors.lock();
    assert!(matches!(&errors[0], ListError::Collection { message } if message == "fetch failed"));
    assert!(matches!(&errors[1], ListError::View { message } if message == "bad row"));
}

#[test]
fn test_run_action_on_selection() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    let collection = Arc::new(Collection::from_models(vec![item(1, "a"), item(2, "b")]));
    let panel = Panel::new(
        PanelConfig::new()
            .collection(collection)
            .action(BulkAction::new("Hide", move |items: &[Arc<Item>]| {
                s.lock().extend(items.iter().map(|i| i.id));
            })),
    );
    panel.render(None);
    assert_eq!(panel.content().controls.action_menu, vec!["Hide".to_string()]);

    panel.views()[1].select(KeyboardModifiers::NONE);
    panel.run_action("Hide").unwrap();
    assert_eq!(*seen.lock(), vec![2]);
    assert!(panel.run_action("Purge").is_err());
}

#[test]
fn test_drag_payload() {
    let collection = Arc::new(Collection::from_models(vec![item(1, "a"), item(2, "b")]));
    let panel = Panel::new(PanelConfig::new().collection(collection).drag_items(true));
    panel.render(None);
    let payloads = Arc::new(Mutex::new(Vec::new()));
    let p = payloads.clone();
    panel
        .signals()
        .drag_start
        .connect(move |payload| p.lock().push(payload.clone()));

    panel.views()[0].drag_start();
    panel.views()[1].select(KeyboardModifiers::NONE);
    panel.views()[0].drag_start();

    let payloads = payloads.lock();
    assert_eq!(payloads[0].ids(), vec![1]);
    assert_eq!(payloads[1].ids(), vec![2]);
    let json: serde_json::Value = serde_json::from_str(&payloads[1].to_json().unwrap()).unwrap();
    assert_eq!(json[0]["name"], "b");
}

// =========================================================================
// Loading indicator, scrolling, rebinding
// =========================================================================

#[test]
fn test_loading_indicator() {
    let (panel, _) = rendered(vec![item(1, "a")]);

    panel.signals().loading.emit(());
    assert_eq!(panel.indicator().as_deref(), Some("loading..."));
    assert!(panel.is_shown(FxTarget::Indicator));
    assert!(!panel.is_shown(FxTarget::Panel));

    panel.signals().loading_done.emit(());
    assert_eq!(panel.indicator(), None);
    assert!(!panel.is_shown(FxTarget::Indicator));
}

#[test]
fn test_scrolling() {
    let (panel, _) = rendered(vec![item(1, "a"), item(2, "b"), item(3, "c")]);

    assert!(panel.scroll_to_id(&3, None));
    assert_eq!(panel.scroll_position(), 2);
    assert!(!panel.scroll_to_id(&9, None));
    assert_eq!(panel.scroll_position(), 2);

    panel.scroll_to_top(None);
    assert_eq!(panel.scroll_position(), 0);
}

#[test]
fn test_set_collection_detaches_old_collection() {
    let (panel, old) = rendered(vec![item(1, "a")]);
    let listeners = old.signals().update.connection_count();
    assert_eq!(listeners, 1);

    let new = Arc::new(Collection::from_models(vec![item(5, "e")]));
    panel.set_collection(new.clone());
    panel.render(None);

    assert_eq!(old.signals().update.connection_count(), 0);
    assert_eq!(old.signals().error.connection_count(), 0);
    old.add(item(2, "b"));
    assert_eq!(ids(&panel.views()), vec![5]);
}
