// extensions/easing.rs
//
// Easing curves for tween progress.
// Only curves that stay inside [0, 1] are offered, so an eased tween never
// leaves the [start, end] range.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Easing function applied to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Slow start.
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Slow start and end.
    QuadInOut,
    /// Stronger slow start and end.
    CubicInOut,
    /// Smooth slow start and end.
    SineInOut,
}

impl Easing {
    /// Map progress `t` in [0, 1] to eased progress in [0, 1].
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (2.0 - 2.0 * t).powi(2) / 2.0
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t.powi(3)
                } else {
                    1.0 - (2.0 - 2.0 * t).powi(3) / 2.0
                }
            }
            Easing::SineInOut => (1.0 - (PI * t).cos()) / 2.0,
        }
    }
}

/// Interpolate between `start` and `end` by eased progress.
///
/// Progress at or past 1 yields `end` itself rather than
/// `start + (end - start)`, which can differ in the last bit.
#[inline]
pub fn interpolate(start: f64, end: f64, progress: f64, easing: Easing) -> f64 {
    if progress >= 1.0 {
        end
    } else {
        start + easing.apply(progress) * (end - start)
    }
}
