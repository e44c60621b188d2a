//! Effect targets and their visibility.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one item view instance on a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewKey(u64);

impl ViewKey {
    /// Allocate a key no other view has.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Something an effect can be played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FxTarget {
    /// The whole panel.
    Panel,
    /// The empty-list message.
    EmptyMessage,
    /// The select-all / deselect-all / bulk-action bar.
    ListActions,
    /// The loading indicator.
    Indicator,
    /// The container the panel scrolls in.
    ScrollContainer,
    /// One item view.
    Item(ViewKey),
}

/// Visibility of every target, as left by the last completed effect.
///
/// Targets never touched are reported with their initial visibility: the
/// panel and the scroll container start shown, everything else hidden.
#[derive(Debug, Clone, Default)]
pub struct Stage {
    shown: HashMap<FxTarget, bool>,
}

impl Stage {
    /// A stage with every target at its initial visibility.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `target` is currently visible.
    pub fn is_shown(&self, target: FxTarget) -> bool {
        self.shown.get(&target).copied().unwrap_or(matches!(
            target,
            FxTarget::Panel | FxTarget::ScrollContainer
        ))
    }

    /// Set visibility without an effect.
    pub fn set_shown(&mut self, target: FxTarget, shown: bool) {
        self.shown.insert(target, shown);
    }

    /// Drop the entry of a target that no longer exists.
    pub fn forget(&mut self, target: FxTarget) {
        self.shown.remove(&target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_visibility() {
        let stage = Stage::new();
        assert!(stage.is_shown(FxTarget::Panel));
        assert!(!stage.is_shown(FxTarget::EmptyMessage));
        assert!(!stage.is_shown(FxTarget::Item(ViewKey::next())));
    }

    #[test]
    fn test_set_and_forget() {
        let mut stage = Stage::new();
        let key = ViewKey::next();
        stage.set_shown(FxTarget::Item(key), true);
        stage.set_shown(FxTarget::Panel, false);
        assert!(stage.is_shown(FxTarget::Item(key)));
        assert!(!stage.is_shown(FxTarget::Panel));
        stage.forget(FxTarget::Item(key));
        assert!(!stage.is_shown(FxTarget::Item(key)));
        assert_ne!(key, ViewKey::next());
    }
}
