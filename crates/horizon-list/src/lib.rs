//! Horizon List - filterable, searchable, multi-select list panels.
//!
//! A [`ListPanel`](panel::ListPanel) renders one item view per entity of an
//! observable [`Collection`](model::Collection) and keeps them in sync:
//!
//! - single additions and removals patch the views in place, with enter and
//!   exit effects queued per view
//! - bulk changes, resets, searches and filter changes rebuild the views
//! - selection supports shift-click ranges, alt-click reveal and bulk actions
//! - a [`ModelListPanel`](panel::ModelListPanel) follows the nested collection
//!   of one [`ParentEntity`](model::ParentEntity) and can be rebound
//!
//! Logical state changes synchronously. Visual effects are played by an
//! [`FxDriver`](fx::FxDriver): [`ImmediateFx`](fx::ImmediateFx) completes
//! them at once, [`Animator`](fx::Animator) steps them on a clock.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_list::prelude::*;
//!
//! struct Dataset {
//!     id: u32,
//!     name: String,
//! }
//!
//! impl Entity for Dataset {
//!     type Id = u32;
//!
//!     fn id(&self) -> u32 {
//!         self.id
//!     }
//!
//!     fn search_fields(&self) -> Vec<SearchField> {
//!         vec![SearchField::new("name", &self.name)]
//!     }
//! }
//!
//! let datasets = Arc::new(Collection::from_models(vec![
//!     Arc::new(Dataset { id: 1, name: "reads.fastq".into() }),
//!     Arc::new(Dataset { id: 2, name: "genome.fasta".into() }),
//! ]));
//! let panel = ListPanel::<ListItemView<Dataset>>::new(
//!     PanelConfig::new().collection(datasets.clone()),
//! );
//! panel.render(None);
//! assert_eq!(panel.views().len(), 2);
//!
//! panel.search_items("fastq", false);
//! assert_eq!(panel.views().len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod fx;
pub mod model;
pub mod panel;
pub mod prelude;
pub mod selection;
pub mod view;

pub use config::{PanelConfig, PanelSettings, ViewFactory};
pub use error::{ListError, Result};

/// Install a `tracing` subscriber for tests.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
