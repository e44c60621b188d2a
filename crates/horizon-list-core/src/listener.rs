//! Listener bookkeeping.
//!
//! A [`Subscriptions`] set records every connection an observer makes to
//! signals it does not own, so that all of them can be dropped in one call
//! when the observer rebinds to a different source. Holding a subscription
//! never keeps the observed object alive.

use crate::logging::targets;
use crate::signal::{ConnectionId, Signal, SignalEmitter};

struct Subscription {
    handle: Box<dyn SignalEmitter>,
    id: ConnectionId,
}

/// A set of connections owned by one observer.
///
/// Connections are disconnected by [`stop_listening`](Self::stop_listening)
/// or when the set is dropped.
///
/// # Example
///
/// ```
/// use horizon_list_core::{Signal, Subscriptions};
///
/// let changed = Signal::<u32>::new();
/// let mut subs = Subscriptions::new();
/// subs.listen(&changed, |n| println!("changed to {n}"));
/// assert_eq!(changed.connection_count(), 1);
///
/// subs.stop_listening();
/// assert_eq!(changed.connection_count(), 0);
/// ```
#[derive(Default)]
pub struct Subscriptions {
    entries: Vec<Subscription>,
}

impl Subscriptions {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect `slot` to `signal` and remember the connection.
    pub fn listen<Args, F>(&mut self, signal: &Signal<Args>, slot: F) -> ConnectionId
    where
        Args: Clone + Send + 'static,
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = signal.connect(slot);
        self.entries.push(Subscription {
            handle: Box::new(signal.handle()),
            id,
        });
        id
    }

    /// Number of connections currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no connections are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Disconnect every tracked connection.
    ///
    /// Returns how many connections were still live.
    pub fn stop_listening(&mut self) -> usize {
        let live = self
            .entries
            .drain(..)
            .filter(|sub| sub.handle.disconnect(sub.id))
            .count();
        if live > 0 {
            tracing::trace!(target: targets::SIGNAL, live, "stopped listening");
        }
        live
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.stop_listening();
    }
}

impl std::fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriptions")
            .field("len", &self.entries.len())
            .finish()
    }
}
