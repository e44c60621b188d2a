//! Entity model for list panels.
//!
//! - [`Entity`] / [`ParentEntity`]: records and records that own a nested list
//! - [`Collection`]: the observable backing collection
//! - [`compute_visible`]: the filter/search pipeline
//! - [`search`]: query tokenizing and matching

mod collection;
mod entity;
mod filter;
pub mod search;

pub use collection::{Collection, CollectionSignals, Comparator, UpdateDelta};
pub use entity::{Entity, ParentEntity, SearchField};
pub use filter::{Filter, compute_visible, filter, passes};

#[cfg(test)]
pub(crate) mod tests_support {
    use std::sync::Arc;

    use super::{Entity, SearchField};

    #[derive(Debug, PartialEq, Eq)]
    pub struct Named {
        pub id: u32,
        pub name: String,
    }

    impl Entity for Named {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }

        fn search_fields(&self) -> Vec<SearchField> {
            vec![SearchField::new("name", &self.name)]
        }
    }

    pub fn named(id: u32, name: &str) -> Arc<Named> {
        Arc::new(Named {
            id,
            name: name.to_string(),
        })
    }
}
