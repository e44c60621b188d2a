//! What a panel currently shows.

use crate::fx::ViewKey;

/// The control bar above the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controls {
    /// Panel title.
    pub title: String,
    /// Panel subtitle.
    pub subtitle: String,
    /// Text in the search input.
    pub search_query: String,
    /// Placeholder of the search input.
    pub search_placeholder: String,
    /// Labels of the bulk-action menu; empty when there are no actions.
    pub action_menu: Vec<String>,
}

/// The panel's rendered representation.
///
/// `items` lists the item views in on-screen order. It trails the panel's
/// logical view list while insert and remove effects are still playing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    /// Control bar.
    pub controls: Controls,
    /// Item views on screen, in order.
    pub items: Vec<ViewKey>,
    /// Text of the empty-list message.
    pub empty_message: String,
}
