//! Bulk actions and drag payloads.

use std::sync::Arc;

use serde::Serialize;

use crate::model::Entity;

type ActionFn<E> = Arc<dyn Fn(&[Arc<E>]) + Send + Sync>;

/// An operation offered for all selected entities at once.
pub struct BulkAction<E> {
    label: String,
    func: ActionFn<E>,
}

impl<E> Clone for BulkAction<E> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            func: self.func.clone(),
        }
    }
}

impl<E: Entity> BulkAction<E> {
    /// Create an action shown as `label`.
    pub fn new<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Arc<E>]) + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    /// Menu label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the action on `selected`.
    pub fn invoke(&self, selected: &[Arc<E>]) {
        (self.func)(selected);
    }
}

impl<E> std::fmt::Debug for BulkAction<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Entities carried by a drag that started on one of a panel's views.
///
/// Holds the selected entities, or just the dragged one when nothing is
/// selected.
pub struct DragPayload<E> {
    /// Dragged entities, in rendered order.
    pub models: Vec<Arc<E>>,
}

impl<E> Clone for DragPayload<E> {
    fn clone(&self) -> Self {
        Self {
            models: self.models.clone(),
        }
    }
}

impl<E: Entity> DragPayload<E> {
    /// Ids of the dragged entities.
    pub fn ids(&self) -> Vec<E::Id> {
        self.models.iter().map(|m| m.id()).collect()
    }
}

impl<E: Serialize> DragPayload<E> {
    /// The payload as a JSON array of entities.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let models: Vec<&E> = self.models.iter().map(|m| m.as_ref()).collect();
        serde_json::to_string(&models)
    }
}

impl<E: Entity> std::fmt::Debug for DragPayload<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragPayload").field("ids", &self.ids()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Serialize)]
    struct Row {
        id: u32,
        name: &'static str,
    }

    impl Entity for Row {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    #[test]
    fn test_payload_json() {
        let payload = DragPayload {
            models: vec![Arc::new(Row { id: 1, name: "a" }), Arc::new(Row { id: 2, name: "b" })],
        };
        assert_eq!(payload.ids(), vec![1, 2]);
        assert_eq!(
            payload.to_json().unwrap(),
            r#"[{"id":1,"name":"a"},{"id":2,"name":"b"}]"#
        );
    }

    #[test]
    fn test_action_receives_selection() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let action = BulkAction::new("Delete", move |rows: &[Arc<Row>]| {
            s.lock().extend(rows.iter().map(|r| r.id));
        });
        action.invoke(&[Arc::new(Row { id: 4, name: "d" })]);
        assert_eq!(action.label(), "Delete");
        assert_eq!(*seen.lock(), vec![4]);
    }
}
