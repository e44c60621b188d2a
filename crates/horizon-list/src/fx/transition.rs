//! Effect kinds and per-effect progress.

use std::time::Duration;

use super::easing::{Easing, ease};

/// A visual effect a panel asks its driver to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Fade from transparent to opaque, ending shown.
    FadeIn,
    /// Fade from opaque to transparent, ending hidden.
    FadeOut,
    /// Reveal by growing, ending shown.
    SlideDown,
    /// Collapse by shrinking, ending hidden.
    SlideUp,
    /// Smooth-scroll the target to a row.
    ScrollTo(usize),
}

impl Effect {
    /// Whether the target is visible once the effect completes.
    ///
    /// `None` for effects that do not change visibility.
    pub fn ends_shown(self) -> Option<bool> {
        match self {
            Effect::FadeIn | Effect::SlideDown => Some(true),
            Effect::FadeOut | Effect::SlideUp => Some(false),
            Effect::ScrollTo(_) => None,
        }
    }
}

/// Current state of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TransitionState {
    /// Not started, or finished.
    #[default]
    Idle,
    /// Running with eased progress in `0.0..=1.0`.
    Running {
        /// Eased progress.
        progress: f32,
    },
}

impl TransitionState {
    /// Whether the transition is in progress.
    pub fn is_running(&self) -> bool {
        matches!(self, TransitionState::Running { .. })
    }

    /// Eased progress if running.
    pub fn progress(&self) -> Option<f32> {
        match self {
            TransitionState::Running { progress } => Some(*progress),
            TransitionState::Idle => None,
        }
    }
}

/// Timing of one effect, advanced by explicit time steps.
///
/// Progress only moves when [`advance`](Self::advance) is called, which lets a
/// driver run effects against a virtual clock.
#[derive(Debug, Clone)]
pub struct Transition {
    effect: Effect,
    easing: Easing,
    duration: Duration,
    elapsed: Duration,
    running: bool,
}

impl Transition {
    /// A stopped transition for `effect` lasting `duration`.
    pub fn new(effect: Effect, duration: Duration) -> Self {
        Self {
            effect,
            easing: Easing::default(),
            duration,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// Use a different easing curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// The effect being played.
    #[inline]
    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Total duration.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the transition has been started and not yet finished.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start from the beginning.
    ///
    /// Returns `false` for zero-length transitions, which are complete at once.
    pub fn start(&mut self) -> bool {
        self.elapsed = Duration::ZERO;
        self.running = !self.duration.is_zero();
        self.running
    }

    /// Move time forward by `dt` and report the new state.
    ///
    /// Returns `Idle` once the full duration has elapsed.
    pub fn advance(&mut self, dt: Duration) -> TransitionState {
        if !self.running {
            return TransitionState::Idle;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.duration {
            self.running = false;
            return TransitionState::Idle;
        }
        TransitionState::Running {
            progress: self.progress(),
        }
    }

    /// Eased progress; `1.0` once finished.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() || !self.running {
            return if self.elapsed >= self.duration { 1.0 } else { 0.0 };
        }
        let raw = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        ease(self.easing, raw)
    }

    /// Target opacity at the current progress.
    ///
    /// Fades interpolate; other effects leave the target opaque.
    pub fn opacity(&self) -> f32 {
        match self.effect {
            Effect::FadeIn => self.progress(),
            Effect::FadeOut => 1.0 - self.progress(),
            _ => 1.0,
        }
    }

    /// Fraction of the target's height revealed at the current progress.
    pub fn extent(&self) -> f32 {
        match self.effect {
            Effect::SlideDown => self.progress(),
            Effect::SlideUp => 1.0 - self.progress(),
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_advance_runs_to_completion() {
        let mut fade = Transition::new(Effect::FadeOut, ms(200)).with_easing(Easing::Linear);
        assert!(fade.start());

        let state = fade.advance(ms(50));
        assert_eq!(state, TransitionState::Running { progress: 0.25 });
        assert_eq!(fade.opacity(), 0.75);

        assert!(fade.advance(ms(100)).is_running());
        assert_eq!(fade.advance(ms(50)), TransitionState::Idle);
        assert!(!fade.is_running());
        assert_eq!(fade.progress(), 1.0);
        assert_eq!(fade.opacity(), 0.0);
    }

    #[test]
    fn test_zero_duration_is_immediately_done() {
        let mut slide = Transition::new(Effect::SlideDown, Duration::ZERO);
        assert!(!slide.start());
        assert_eq!(slide.progress(), 1.0);
        assert_eq!(slide.extent(), 1.0);
    }

    #[test]
    fn test_not_started_does_not_advance() {
        let mut fade = Transition::new(Effect::FadeIn, ms(100));
        assert_eq!(fade.advance(ms(500)), TransitionState::Idle);
        assert_eq!(fade.progress(), 0.0);
    }

    #[test]
    fn test_end_visibility() {
        assert_eq!(Effect::FadeIn.ends_shown(), Some(true));
        assert_eq!(Effect::SlideUp.ends_shown(), Some(false));
        assert_eq!(Effect::ScrollTo(3).ends_shown(), None);
    }
}
