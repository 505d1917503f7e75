use thiserror::Error;

/// Errors raised while building motion sequences.
///
/// The running sequences themselves have no failure path; everything here is
/// a rejected input caught before the first frame is requested.
#[derive(Debug, Error)]
pub enum MotionError {
    /// Duration must be finite and strictly positive.
    #[error("duration must be finite and > 0, got {0}")]
    InvalidDuration(f64),

    /// A numeric field was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// Headless frame interval must be finite and strictly positive.
    #[error("frame interval must be finite and > 0 ms, got {0}")]
    InvalidFrameInterval(f64),

    /// Waves repeat at least once.
    #[error("repeat count must be >= 1, got {0}")]
    InvalidRepeat(u32),

    /// The manifest has no track with this name.
    #[error("unknown track: {0}")]
    UnknownTrack(String),

    /// The manifest JSON did not parse.
    #[error("invalid animation manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Reject NaN and infinities for a named field.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, MotionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MotionError::NonFinite { field, value })
    }
}

/// Reject non-positive or non-finite durations.
pub(crate) fn ensure_duration(duration: f64) -> Result<f64, MotionError> {
    if duration.is_finite() && duration > 0.0 {
        Ok(duration)
    } else {
        Err(MotionError::InvalidDuration(duration))
    }
}
