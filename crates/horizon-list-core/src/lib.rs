//! Core primitives for Horizon List.
//!
//! This crate provides the building blocks the list panel is made of:
//!
//! - **Signal/Slot System**: Type-safe observer notifications ([`Signal`])
//! - **Listener Bookkeeping**: Bulk detach of everything an observer connected
//!   to ([`Subscriptions`])
//! - **Step Queues**: Strictly serialized steps with explicit completion
//!   ([`StepQueue`], [`Done`])
//! - **Logging**: `tracing` target names ([`logging::targets`])
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_list_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Step Queue Example
//!
//! ```
//! use horizon_list_core::{StepQueue, step};
//!
//! let queue = StepQueue::new();
//! queue.enqueue([
//!     step(|done| { println!("fade out"); done.finish(); }),
//!     step(|done| { println!("swap"); done.finish(); }),
//!     step(|done| { println!("fade in"); done.finish(); }),
//! ]);
//! assert!(!queue.is_running());
//! ```

pub mod listener;
pub mod logging;
pub mod queue;
pub mod signal;

pub use listener::Subscriptions;
pub use queue::{Done, QueueId, Step, StepQueue, step};
pub use signal::{ConnectionGuard, ConnectionId, Signal, SignalEmitter, SignalHandle};
