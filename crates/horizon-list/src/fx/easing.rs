//! Easing curves for panel effects.
//!
//! A curve maps linear progress in `0.0..=1.0` to eased progress.

use std::f32::consts::PI;

/// Available easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Output equals input.
    Linear,
    /// Quadratic, slow start.
    EaseIn,
    /// Quadratic, slow end.
    EaseOut,
    /// Quadratic, slow at both ends.
    EaseInOut,
    /// The "swing" curve most list effects use: sinusoidal, slow at both ends.
    #[default]
    Swing,
}

/// Apply `easing` to progress `t`, clamping `t` into `0.0..=1.0`.
///
/// # Example
///
/// ```
/// use horizon_list::fx::{ease, Easing};
///
/// assert_eq!(ease(Easing::Linear, 0.25), 0.25);
/// assert!(ease(Easing::EaseIn, 0.5) < 0.5);
/// assert!(ease(Easing::EaseOut, 0.5) > 0.5);
/// ```
#[inline]
pub fn ease(easing: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match easing {
        Easing::Linear => t,
        Easing::EaseIn => t * t,
        Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
        Easing::Swing => 0.5 - (PI * t).cos() / 2.0,
    }
}

/// Interpolate from `start` to `end` along `easing`.
#[inline]
pub fn lerp_eased(easing: Easing, start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * ease(easing, t)
}
