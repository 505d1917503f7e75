/// One tick of a frame clock, as seen by a single subscription.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Timestamp reported by the frame source for this frame.
    pub timestamp: f64,
    /// Time since the subscription started. Never negative.
    pub elapsed: f64,
}

/// Handle to a pending frame callback, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);
