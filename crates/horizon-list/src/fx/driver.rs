//! Effect drivers.
//!
//! A panel never animates anything itself: it hands each effect to an
//! [`FxDriver`] together with the [`Done`] token of the queue step waiting on
//! it. Headless code and tests use [`ImmediateFx`]; [`Animator`] plays effects
//! against a virtual clock.

use std::time::Duration;

use horizon_list_core::Done;
use horizon_list_core::logging::targets;
use parking_lot::Mutex;

use super::easing::Easing;
use super::stage::FxTarget;
use super::transition::{Effect, Transition};

/// Plays visual effects and reports their completion.
pub trait FxDriver: Send + Sync {
    /// Play `effect` on `target` over `duration`, then finish `done`.
    ///
    /// Drivers may finish `done` before returning. A driver that never
    /// finishes it stalls the queue that is waiting on it.
    fn play(&self, target: FxTarget, effect: Effect, duration: Duration, done: Done);
}

/// Completes every effect synchronously.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateFx;

impl FxDriver for ImmediateFx {
    fn play(&self, target: FxTarget, effect: Effect, duration: Duration, done: Done) {
        tracing::trace!(target: targets::FX, fx_target = ?target, ?effect, ?duration, "effect completed immediately");
        done.finish();
    }
}

struct Running {
    target: FxTarget,
    transition: Transition,
    done: Done,
}

#[derive(Default)]
struct AnimatorState {
    running: Vec<Running>,
    clock: Duration,
}

/// Runs effects on a virtual clock advanced by the caller.
///
/// Zero-length effects complete inside [`play`](FxDriver::play). Everything
/// else completes during the [`advance`](Self::advance) call that moves the
/// clock past its end, in the order the effects were started.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use horizon_list::fx::{Animator, Effect, FxDriver, FxTarget};
/// use horizon_list_core::Done;
///
/// let animator = Animator::new();
/// animator.play(FxTarget::Panel, Effect::FadeOut, Duration::from_millis(200), Done::noop());
///
/// animator.advance(Duration::from_millis(100));
/// assert!(animator.opacity(FxTarget::Panel).is_some());
///
/// assert_eq!(animator.advance(Duration::from_millis(100)), 1);
/// assert!(animator.is_idle());
/// ```
pub struct Animator {
    easing: Easing,
    state: Mutex<AnimatorState>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    /// An idle animator using the default easing curve.
    pub fn new() -> Self {
        Self::with_easing(Easing::default())
    }

    /// An idle animator using `easing` for every effect.
    pub fn with_easing(easing: Easing) -> Self {
        Self {
            easing,
            state: Mutex::new(AnimatorState::default()),
        }
    }

    /// Move the clock forward and complete every effect that ended.
    ///
    /// Completion callbacks run after the animator's lock is released, so they
    /// may start new effects; those begin at the new clock time. Returns the
    /// number of effects completed.
    pub fn advance(&self, dt: Duration) -> usize {
        let finished = {
            let mut state = self.state.lock();
            state.clock = state.clock.saturating_add(dt);
            let mut finished = Vec::new();
            let mut still_running = Vec::new();
            for mut run in std::mem::take(&mut state.running) {
                if run.transition.advance(dt).is_running() {
                    still_running.push(run);
                } else {
                    finished.push(run);
                }
            }
            state.running = still_running;
            finished
        };
        let count = finished.len();
        for run in finished {
            tracing::trace!(target: targets::FX, fx_target = ?run.target, effect = ?run.transition.effect(), "effect finished");
            run.done.finish();
        }
        count
    }

    /// Advance until no effect is running, including effects started by
    /// completions along the way. Returns the number of effects completed.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            let step = {
                let state = self.state.lock();
                state.running.iter().map(|r| r.transition.duration()).max()
            };
            match step {
                Some(step) => total += self.advance(step),
                None => return total,
            }
        }
    }

    /// Current opacity of `target` if an effect is running on it.
    pub fn opacity(&self, target: FxTarget) -> Option<f32> {
        self.state
            .lock()
            .running
            .iter()
            .rev()
            .find(|r| r.target == target)
            .map(|r| r.transition.opacity())
    }

    /// Whether an effect is running on `target`.
    pub fn is_animating(&self, target: FxTarget) -> bool {
        self.state.lock().running.iter().any(|r| r.target == target)
    }

    /// Number of running effects.
    pub fn running_count(&self) -> usize {
        self.state.lock().running.len()
    }

    /// Whether nothing is running.
    pub fn is_idle(&self) -> bool {
        self.running_count() == 0
    }

    /// Time elapsed on the virtual clock.
    pub fn clock(&self) -> Duration {
        self.state.lock().clock
    }
}

impl FxDriver for Animator {
    fn play(&self, target: FxTarget, effect: Effect, duration: Duration, done: Done) {
        let mut transition = Transition::new(effect, duration).with_easing(self.easing);
        if !transition.start() {
            tracing::trace!(target: targets::FX, fx_target = ?target, ?effect, "zero-length effect");
            done.finish();
            return;
        }
        tracing::trace!(target: targets::FX, fx_target = ?target, ?effect, ?duration, "effect started");
        self.state.lock().running.push(Running {
            target,
            transition,
            done,
        });
    }
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Animator")
            .field("easing", &self.easing)
            .field("running", &state.running.len())
            .field("clock", &state.clock)
            .finish()
    }
}

static_assertions::assert_impl_all!(Animator: Send, Sync);
static_assertions::assert_impl_all!(ImmediateFx: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Done {
        let log = log.clone();
        Done::new(move || log.lock().push(name))
    }

    #[test]
    fn test_immediate_finishes_inline() {
        let log = Arc::new(Mutex::new(Vec::new()));
        ImmediateFx.play(FxTarget::Panel, Effect::FadeIn, ms(200), recorder(&log, "done"));
        assert_eq!(*log.lock(), vec!["done"]);
    }

    #[test]
    fn test_animator_completes_in_end_order() {
        let animator = Animator::with_easing(Easing::Linear);
        let log = Arc::new(Mutex::new(Vec::new()));
        animator.play(FxTarget::Panel, Effect::FadeOut, ms(200), recorder(&log, "panel"));
        animator.play(FxTarget::EmptyMessage, Effect::FadeIn, ms(50), recorder(&log, "empty"));

        assert_eq!(animator.advance(ms(50)), 1);
        assert_eq!(*log.lock(), vec!["empty"]);
        assert_eq!(animator.opacity(FxTarget::Panel), Some(0.75));
        assert!(!animator.is_animating(FxTarget::EmptyMessage));

        assert_eq!(animator.advance(ms(150)), 1);
        assert_eq!(*log.lock(), vec!["empty", "panel"]);
        assert_eq!(animator.clock(), ms(200));
    }

    #[test]
    fn test_zero_length_completes_in_play() {
        let animator = Animator::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        animator.play(FxTarget::Indicator, Effect::SlideUp, Duration::ZERO, recorder(&log, "now"));
        assert_eq!(*log.lock(), vec!["now"]);
        assert!(animator.is_idle());
    }

    #[test]
    fn test_completion_may_start_another_effect() {
        let animator = Arc::new(Animator::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let chained = animator.clone();
        let l = log.clone();
        let second = recorder(&log, "second");
        animator.play(
            FxTarget::Panel,
            Effect::FadeOut,
            ms(100),
            Done::new(move || {
                l.lock().push("first");
                chained.play(FxTarget::Panel, Effect::FadeIn, ms(100), second);
            }),
        );

        assert_eq!(animator.run_until_idle(), 2);
        assert_eq!(*log.lock(), vec!["first", "second"]);
    }
}
