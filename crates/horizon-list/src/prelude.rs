//! Prelude module for Horizon List.
//!
//! ```ignore
//! use horizon_list::prelude::*;
//! ```

// ============================================================================
// Core primitives
// ============================================================================

pub use horizon_list_core::{ConnectionId, Done, Signal, StepQueue, Subscriptions, step};

// ============================================================================
// Entities and collections
// ============================================================================

pub use crate::model::{Collection, Entity, Filter, ParentEntity, SearchField, UpdateDelta};

// ============================================================================
// Panels
// ============================================================================

pub use crate::config::{PanelConfig, PanelSettings};
pub use crate::error::ListError;
pub use crate::panel::{
    BulkAction, Content, DataSource, DragPayload, ListPanel, ModelListPanel, PanelSignals,
};
pub use crate::selection::KeyboardModifiers;
pub use crate::view::{ItemView, ItemViewEvent, ItemViewOptions, ListItemView};

// ============================================================================
// Effects
// ============================================================================

pub use crate::fx::{Animator, Effect, FxDriver, FxTarget, ImmediateFx};
