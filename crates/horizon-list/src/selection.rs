//! Selection bookkeeping for list panels.
//!
//! Selection is kept as entity ids, decoupled from item view lifetimes. Ids
//! are resolved to views only when needed, so an id whose view is gone is
//! harmless: looking it up simply finds nothing.

use std::sync::Arc;

/// Keyboard modifier state accompanying a selection gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        control: true,
        ..Self::NONE
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// Whether no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Selected ids plus the range anchor.
///
/// `selected` may hold an id more than once (a view selected again after a
/// range selection, for example); it is treated as a set everywhere it is
/// read.
#[derive(Debug, Clone)]
pub struct SelectionState<Id> {
    selected: Vec<Id>,
    last_selected: Option<Id>,
}

impl<Id> Default for SelectionState<Id> {
    fn default() -> Self {
        Self {
            selected: Vec::new(),
            last_selected: None,
        }
    }
}

impl<Id: Clone + PartialEq> SelectionState<Id> {
    /// A selection preloaded with `selected`, with no anchor.
    pub fn new(selected: Vec<Id>) -> Self {
        Self {
            selected,
            last_selected: None,
        }
    }

    /// Selected ids in the order they were recorded.
    pub fn selected(&self) -> &[Id] {
        &self.selected
    }

    /// Selected ids without repeats.
    pub fn unique(&self) -> Vec<Id> {
        let mut unique: Vec<Id> = Vec::with_capacity(self.selected.len());
        for id in &self.selected {
            if !unique.contains(id) {
                unique.push(id.clone());
            }
        }
        unique
    }

    /// The range anchor.
    pub fn last_selected(&self) -> Option<&Id> {
        self.last_selected.as_ref()
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    /// Record a selection of `id`, making it the range anchor.
    pub fn record_select(&mut self, id: Id) {
        self.selected.push(id.clone());
        self.last_selected = Some(id);
    }

    /// Forget every occurrence of `id`. The anchor is left alone.
    pub fn record_deselect(&mut self, id: &Id) {
        self.selected.retain(|s| s != id);
    }

    /// Drop the range anchor.
    pub fn clear_anchor(&mut self) {
        self.last_selected = None;
    }

    /// Forget all selected ids and the anchor.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.last_selected = None;
    }
}

/// The views between `from` and `to`, both inclusive, in rendered order.
///
/// Endpoints are compared by identity. The result degrades instead of
/// failing:
///
/// - identical endpoints give that single view, or nothing for `None`
/// - if one endpoint is not among `views`, only the other endpoint is given
/// - if neither is, the result is empty
pub fn view_range<V>(views: &[Arc<V>], from: Option<&Arc<V>>, to: Option<&Arc<V>>) -> Vec<Arc<V>> {
    match (from, to) {
        (None, None) => return Vec::new(),
        (Some(a), Some(b)) if Arc::ptr_eq(a, b) => return vec![a.clone()],
        _ => {}
    }
    let position = |v: Option<&Arc<V>>| v.and_then(|v| views.iter().position(|w| Arc::ptr_eq(v, w)));
    match (position(from), position(to)) {
        (Some(a), Some(b)) => {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            views[lo..=hi].to_vec()
        }
        (Some(a), None) => vec![views[a].clone()],
        (None, Some(b)) => vec![views[b].clone()],
        (None, None) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn views(n: usize) -> Vec<Arc<usize>> {
        (0..n).map(Arc::new).collect()
    }

    fn values(range: &[Arc<usize>]) -> Vec<usize> {
        range.iter().map(|v| **v).collect()
    }

    #[test]
    fn test_range_is_order_independent() {
        let v = views(4);
        assert_eq!(values(&view_range(&v, Some(&v[0]), Some(&v[3]))), vec![0, 1, 2, 3]);
        assert_eq!(values(&view_range(&v, Some(&v[2]), Some(&v[1]))), vec![1, 2]);
    }

    #[test]
    fn test_range_same_endpoint() {
        let v = views(3);
        assert_eq!(values(&view_range(&v, Some(&v[1]), Some(&v[1]))), vec![1]);
        assert!(view_range::<usize>(&v, None, None).is_empty());
    }

    #[test]
    fn test_range_missing_endpoint_degrades() {
        let v = views(3);
        let stranger = Arc::new(0usize);
        assert_eq!(values(&view_range(&v, Some(&stranger), Some(&v[2]))), vec![2]);
        assert_eq!(values(&view_range(&v, Some(&v[1]), None)), vec![1]);
        let other = Arc::new(9usize);
        assert!(view_range(&v, Some(&stranger), Some(&other)).is_empty());
    }

    #[test]
    fn test_state_records_and_clears() {
        let mut state = SelectionState::new(vec![7]);
        assert_eq!(state.last_selected(), None);

        state.record_select(1);
        state.record_select(2);
        state.record_select(1);
        assert_eq!(state.selected(), &[7, 1, 2, 1]);
        assert_eq!(state.unique(), vec![7, 1, 2]);
        assert_eq!(state.last_selected(), Some(&1));

        state.record_deselect(&1);
        assert_eq!(state.selected(), &[7, 2]);
        assert_eq!(state.last_selected(), Some(&1));

        state.clear_anchor();
        assert_eq!(state.last_selected(), None);
        assert!(state.contains(&2));

        state.clear();
        assert!(state.selected().is_empty());
    }

    #[test]
    fn test_modifier_constants() {
        assert!(KeyboardModifiers::NONE.is_empty());
        assert!(KeyboardModifiers::SHIFT.shift);
        assert!(!KeyboardModifiers::ALT.shift && KeyboardModifiers::ALT.alt);
    }
}
