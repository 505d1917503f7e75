use serde::{Deserialize, Serialize};

use super::error::MotionError;

/// Runtime configuration for driving motion sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Frame interval in milliseconds used by headless clocks (default: 1000/60).
    pub frame_interval_ms: f64,
    /// Upper bound on frames a headless run will step before giving up (default: 100_000).
    pub max_frames: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 1000.0 / 60.0,
            max_frames: 100_000,
        }
    }
}

impl MotionConfig {
    pub fn with_frame_interval(mut self, frame_interval_ms: f64) -> Self {
        self.frame_interval_ms = frame_interval_ms;
        self
    }

    pub fn with_max_frames(mut self, max_frames: u32) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// A zero or negative interval would step frames without moving time.
    pub fn validate(&self) -> Result<(), MotionError> {
        let interval = self.frame_interval_ms;
        if interval.is_finite() && interval > 0.0 {
            Ok(())
        } else {
            Err(MotionError::InvalidFrameInterval(interval))
        }
    }
}
