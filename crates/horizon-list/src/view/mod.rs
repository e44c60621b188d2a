//! Item views.

mod item;

pub use item::{ItemView, ItemViewEvent, ItemViewOptions, ListItemView};
