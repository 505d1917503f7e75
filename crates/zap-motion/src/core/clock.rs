//! Frame clocks.
//!
//! A `FrameSource` is the host's "call me on the next display refresh"
//! primitive. Sequences never reach for a global scheduler; the source is
//! handed in, so the same composition runs against `requestAnimationFrame` in
//! the browser and against `ManualClock` in tests.

use std::cell::{Cell, RefCell};

use crate::api::config::MotionConfig;
use crate::api::types::FrameRequest;

/// Callback invoked with the frame timestamp.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Host frame scheduling, modelled on `requestAnimationFrame`.
pub trait FrameSource {
    /// Current time on this source's timeline.
    fn now(&self) -> f64;

    /// Run `callback` once, on the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameRequest;

    /// Drop a pending callback. Unknown or already-fired requests are ignored.
    fn cancel_frame(&self, request: FrameRequest);
}

/// Pending frame callbacks, in request order.
///
/// Shared by every `FrameSource` implementation so they agree on what "next
/// frame" means: callbacks requested while a frame is firing wait for the
/// following frame, and a callback cancelled earlier in the same frame is
/// skipped.
#[derive(Default)]
pub struct FrameQueue {
    next_id: Cell<u64>,
    pending: RefCell<Vec<(FrameRequest, FrameCallback)>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a callback for the next `fire`.
    pub fn push(&self, callback: FrameCallback) -> FrameRequest {
        let request = FrameRequest(self.next_id.get());
        self.next_id.set(request.0 + 1);
        self.pending.borrow_mut().push((request, callback));
        request
    }

    /// Remove a pending callback. Returns true if it was still queued.
    pub fn cancel(&self, request: FrameRequest) -> bool {
        let mut pending = self.pending.borrow_mut();
        match pending.iter().position(|(r, _)| *r == request) {
            Some(idx) => {
                pending.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Run every callback that was queued before this call.
    /// Returns the number of callbacks that ran.
    pub fn fire(&self, timestamp: f64) -> usize {
        let due: Vec<FrameRequest> = self.pending.borrow().iter().map(|(r, _)| *r).collect();
        let mut ran = 0;

        for request in due {
            // Pull one at a time: an earlier callback may have cancelled this one.
            let callback = {
                let mut pending = self.pending.borrow_mut();
                pending
                    .iter()
                    .position(|(r, _)| *r == request)
                    .map(|idx| pending.remove(idx).1)
            };
            if let Some(callback) = callback {
                callback(timestamp);
                ran += 1;
            }
        }

        ran
    }

    /// Number of callbacks waiting for a frame.
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Drop all pending callbacks.
    pub fn clear(&self) {
        self.pending.borrow_mut().clear();
    }
}

/// Deterministic frame source driven by hand.
///
/// Usage:
///   let clock = Rc::new(ManualClock::new());
///   let sub = tween(clock.clone(), 0.0, 100.0, 1000.0)?.subscribe(...);
///   clock.advance_to(500.0);   // fires one frame at t=500
pub struct ManualClock {
    now: Cell<f64>,
    queue: FrameQueue,
    frames: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a clock whose timeline starts at `now`.
    pub fn starting_at(now: f64) -> Self {
        Self {
            now: Cell::new(now),
            queue: FrameQueue::new(),
            frames: Cell::new(0),
        }
    }

    /// Move time to `timestamp` and fire one frame there.
    /// Returns the number of callbacks that ran.
    pub fn advance_to(&self, timestamp: f64) -> usize {
        self.now.set(timestamp);
        self.frames.set(self.frames.get() + 1);
        self.queue.fire(timestamp)
    }

    /// Move time forward by `dt` and fire one frame.
    pub fn advance_by(&self, dt: f64) -> usize {
        self.advance_to(self.now.get() + dt)
    }

    /// Step frames at the configured interval until nothing is pending,
    /// or `max_frames` is reached. Returns the number of frames stepped.
    pub fn run(&self, config: &MotionConfig) -> u32 {
        let mut stepped = 0;
        while !self.queue.is_empty() && stepped < config.max_frames {
            self.advance_by(config.frame_interval_ms);
            stepped += 1;
        }
        if !self.queue.is_empty() {
            log::warn!(
                "manual clock stopped after {} frames with {} callbacks pending",
                stepped,
                self.queue.len()
            );
        }
        stepped
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Frames fired so far.
    pub fn frame_count(&self) -> u64 {
        self.frames.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn request_frame(&self, callback: FrameCallback) -> FrameRequest {
        self.queue.push(callback)
    }

    fn cancel_frame(&self, request: FrameRequest) {
        self.queue.cancel(request);
    }
}
