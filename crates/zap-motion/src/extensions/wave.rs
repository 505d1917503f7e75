// extensions/wave.rs
//
// Wave: an oscillation built from three chained tweens per cycle:
//   0 → +amplitude over duration/4
//   +amplitude → -amplitude over duration/2
//   -amplitude → 0 over duration/4
// repeated `repeat` times, strictly one segment after another.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ensure_duration, ensure_finite, MotionError};
use crate::core::clock::FrameSource;
use crate::core::sequence::Sequence;
use crate::systems::concat::concat_indexed;
use super::tween::TweenSpec;

/// Segments per wave cycle.
pub const SEGMENTS_PER_CYCLE: usize = 3;

/// One oscillation pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveSpec {
    /// Peak displacement from zero.
    pub amplitude: f64,
    /// Duration of one full cycle.
    pub duration: f64,
    /// Number of cycles (at least 1).
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

impl WaveSpec {
    pub fn new(amplitude: f64, duration: f64, repeat: u32) -> Result<Self, MotionError> {
        let spec = Self {
            amplitude,
            duration,
            repeat,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), MotionError> {
        ensure_finite("amplitude", self.amplitude)?;
        ensure_duration(self.duration)?;
        if self.repeat == 0 {
            return Err(MotionError::InvalidRepeat(self.repeat));
        }
        Ok(())
    }

    /// The three tweens making up one cycle.
    pub fn cycle(&self) -> [TweenSpec; SEGMENTS_PER_CYCLE] {
        let a = self.amplitude;
        let quarter = self.duration / 4.0;
        let half = self.duration / 2.0;
        [
            segment(0.0, a, quarter),
            segment(a, -a, half),
            segment(-a, 0.0, quarter),
        ]
    }

    /// Total number of tween segments.
    pub fn segment_count(&self) -> u64 {
        u64::from(self.repeat) * SEGMENTS_PER_CYCLE as u64
    }

    /// Every segment, in playback order. Lazy: `repeat` may be huge.
    pub fn segments(&self) -> impl Iterator<Item = TweenSpec> {
        let cycle = self.cycle();
        (0..self.repeat).flat_map(move |_| cycle)
    }

    /// Build the frame-driven sequence for this wave. Segments are created
    /// one at a time as playback reaches them.
    pub fn sequence(&self, source: Rc<dyn FrameSource>) -> Sequence<f64> {
        let cycle = self.cycle();
        concat_indexed(self.segment_count(), move |i| {
            cycle[(i % SEGMENTS_PER_CYCLE as u64) as usize].sequence(Rc::clone(&source))
        })
    }
}

fn segment(start: f64, end: f64, duration: f64) -> TweenSpec {
    TweenSpec {
        start,
        end,
        duration,
        easing: Default::default(),
    }
}

/// Oscillate around zero with the given amplitude, `repeat` times.
pub fn wave(
    source: Rc<dyn FrameSource>,
    amplitude: f64,
    duration: f64,
    repeat: u32,
) -> Result<Sequence<f64>, MotionError> {
    Ok(WaveSpec::new(amplitude, duration, repeat)?.sequence(source))
}
