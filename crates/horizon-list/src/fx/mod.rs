//! Visual effects.
//!
//! Effects are requested by the panel and played by a pluggable
//! [`FxDriver`]. Logical state never waits on them: only the visual steps in
//! a panel's step queues do.

mod driver;
mod easing;
mod stage;
mod transition;

pub use driver::{Animator, FxDriver, ImmediateFx};
pub use easing::{Easing, ease, lerp_eased};
pub use stage::{FxTarget, Stage, ViewKey};
pub use transition::{Effect, Transition, TransitionState};
