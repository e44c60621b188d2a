//! Panel configuration.
//!
//! [`PanelSettings`] holds the plain, serializable options and can be loaded
//! from TOML. [`PanelConfig`] adds the parts that cannot be serialized (the
//! collection, the view factory, filters, the effect driver and bulk actions)
//! and is what panels are built from.
//!
//! ```
//! use horizon_list::PanelSettings;
//!
//! let settings = PanelSettings::from_toml_str(r#"
//!     fx_speed_ms = 0
//!     drag_items = true
//!     title = "History"
//! "#).unwrap();
//! assert!(settings.drag_items);
//! assert_eq!(settings.throttle_selector_fx_at, 20);
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fx::{FxDriver, ImmediateFx};
use crate::model::{Collection, Entity, Filter};
use crate::panel::BulkAction;
use crate::view::{ItemView, ItemViewOptions};

/// Serializable panel options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Duration of panel effects, in milliseconds.
    pub fx_speed_ms: u64,
    /// Whether selectors start visible. Unset means the panel's own default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selecting: Option<bool>,
    /// Whether views may be dragged.
    pub drag_items: bool,
    /// Rendered-view count at which selector effects are skipped.
    pub throttle_selector_fx_at: usize,
    /// Panel title.
    pub title: String,
    /// Panel subtitle.
    pub subtitle: String,
    /// Message for an empty list.
    pub empty_message: String,
    /// Message when search or filters exclude everything.
    pub none_found_message: String,
    /// Placeholder of the search input.
    pub search_placeholder: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            fx_speed_ms: 200,
            selecting: None,
            drag_items: false,
            throttle_selector_fx_at: 20,
            title: String::new(),
            subtitle: String::new(),
            empty_message: "This list is empty".into(),
            none_found_message: "No matching items found".into(),
            search_placeholder: "search".into(),
        }
    }
}

impl PanelSettings {
    /// Parse settings from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Effect duration.
    pub fn fx_speed(&self) -> Duration {
        Duration::from_millis(self.fx_speed_ms)
    }
}

/// Builds an item view from its options.
pub type ViewFactory<V> = Arc<dyn Fn(ItemViewOptions<<V as ItemView>::Model>) -> V + Send + Sync>;

type Id<V> = <<V as ItemView>::Model as Entity>::Id;

/// Everything a panel is initialized from.
///
/// # Example
///
/// ```ignore
/// let config = PanelConfig::<ListItemView<Dataset>>::new()
///     .collection(datasets)
///     .search_for("fastq")
///     .filter(|d: &Dataset| !d.deleted)
///     .fx_driver(Arc::new(Animator::new()));
/// let panel = ListPanel::new(config);
/// ```
pub struct PanelConfig<V: ItemView> {
    pub(crate) settings: PanelSettings,
    pub(crate) collection: Option<Arc<Collection<V::Model>>>,
    pub(crate) view_factory: Option<ViewFactory<V>>,
    pub(crate) filters: Vec<Filter<V::Model>>,
    pub(crate) search_for: String,
    pub(crate) selected: Vec<Id<V>>,
    pub(crate) fx_driver: Arc<dyn FxDriver>,
    pub(crate) actions: Vec<BulkAction<V::Model>>,
    pub(crate) log_errors: bool,
}

impl<V: ItemView> Default for PanelConfig<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ItemView> PanelConfig<V> {
    /// Defaults: a fresh empty collection, no filters or query, nothing
    /// selected, effects completed immediately, errors logged.
    pub fn new() -> Self {
        Self::from_settings(PanelSettings::default())
    }

    /// Start from loaded settings.
    pub fn from_settings(settings: PanelSettings) -> Self {
        Self {
            settings,
            collection: None,
            view_factory: None,
            filters: Vec::new(),
            search_for: String::new(),
            selected: Vec::new(),
            fx_driver: Arc::new(ImmediateFx),
            actions: Vec::new(),
            log_errors: true,
        }
    }

    /// The settings part.
    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    /// Render this collection instead of a fresh empty one.
    pub fn collection(mut self, collection: Arc<Collection<V::Model>>) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Create views with `factory` instead of [`ItemView::from_options`].
    pub fn view_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(ItemViewOptions<V::Model>) -> V + Send + Sync + 'static,
    {
        self.view_factory = Some(Arc::new(factory));
        self
    }

    /// Add one filter.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&V::Model) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(predicate));
        self
    }

    /// Replace the filter set.
    pub fn filters(mut self, filters: Vec<Filter<V::Model>>) -> Self {
        self.filters = filters;
        self
    }

    /// Initial search query.
    pub fn search_for(mut self, query: impl Into<String>) -> Self {
        self.search_for = query.into();
        self
    }

    /// Whether selectors start visible.
    pub fn selecting(mut self, selecting: bool) -> Self {
        self.settings.selecting = Some(selecting);
        self
    }

    /// Ids that start selected.
    pub fn selected(mut self, ids: Vec<Id<V>>) -> Self {
        self.selected = ids;
        self
    }

    /// Enable dragging views.
    pub fn drag_items(mut self, drag_items: bool) -> Self {
        self.settings.drag_items = drag_items;
        self
    }

    /// Duration of panel effects.
    pub fn fx_speed(mut self, speed: Duration) -> Self {
        self.settings.fx_speed_ms = u64::try_from(speed.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// View count at which selector effects are skipped.
    pub fn throttle_selector_fx_at(mut self, count: usize) -> Self {
        self.settings.throttle_selector_fx_at = count;
        self
    }

    /// Panel title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.settings.title = title.into();
        self
    }

    /// Panel subtitle.
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.settings.subtitle = subtitle.into();
        self
    }

    /// Driver that plays panel effects.
    pub fn fx_driver(mut self, driver: Arc<dyn FxDriver>) -> Self {
        self.fx_driver = driver;
        self
    }

    /// Offer `action` for the selected entities.
    pub fn action(mut self, action: BulkAction<V::Model>) -> Self {
        self.actions.push(action);
        self
    }

    /// Whether the default error handler logs relayed errors.
    pub fn log_errors(mut self, log_errors: bool) -> Self {
        self.log_errors = log_errors;
        self
    }
}

impl<V: ItemView> std::fmt::Debug for PanelConfig<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelConfig")
            .field("settings", &self.settings)
            .field("has_collection", &self.collection.is_some())
            .field("filters", &self.filters.len())
            .field("search_for", &self.search_for)
            .field("selected", &self.selected)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListError;

    #[test]
    fn test_defaults() {
        let settings = PanelSettings::default();
        assert_eq!(settings.fx_speed(), Duration::from_millis(200));
        assert_eq!(settings.selecting, None);
        assert_eq!(settings.empty_message, "This list is empty");
        assert_eq!(settings.none_found_message, "No matching items found");
        assert_eq!(settings.search_placeholder, "search");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = PanelSettings::from_toml_str(
            r#"
            selecting = false
            throttle_selector_fx_at = 5
            empty_message = "Nothing here"
            "#,
        )
        .unwrap();
        assert_eq!(settings.selecting, Some(false));
        assert_eq!(settings.throttle_selector_fx_at, 5);
        assert_eq!(settings.empty_message, "Nothing here");
        assert_eq!(settings.fx_speed_ms, 200);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = PanelSettings::from_toml_str("fx_speed_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, ListError::Config(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let settings = PanelSettings {
            title: "History".into(),
            ..PanelSettings::default()
        };
        let text = toml::to_string(&settings).unwrap();
        assert_eq!(PanelSettings::from_toml_str(&text).unwrap(), settings);
    }
}
