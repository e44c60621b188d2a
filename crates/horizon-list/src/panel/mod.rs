//! List panels.
//!
//! - [`ListPanel`]: a panel over any [`DataSource`]
//! - [`ModelListPanel`]: a panel over the nested collection of one entity
//! - [`PanelSignals`]: everything a panel emits
//! - [`Content`]: what a panel currently shows

mod actions;
mod content;
mod list_panel;
mod model_panel;
mod signals;
mod source;

pub use actions::{BulkAction, DragPayload};
pub use content::{Content, Controls};
pub use list_panel::ListPanel;
pub use model_panel::ModelListPanel;
pub use signals::PanelSignals;
pub use source::{DataSource, ErrorRelay, ParentSource, StaticSource};
