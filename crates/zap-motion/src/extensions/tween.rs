// extensions/tween.rs
//
// Tween: a finite, frame-sampled interpolation from `start` to `end`.
//
// Usage:
//   let x = tween(clock.clone(), 0.0, 200.0, 3600.0)?;
//   let sub = x.subscribe(|v| apply(v), || {});
//
// Every frame maps elapsed time to progress = elapsed / duration. Frames with
// progress < 1 emit the interpolated value; the first frame at or past 1 is
// swallowed and replaced by exactly `end`, then the sequence completes.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ensure_duration, ensure_finite, MotionError};
use crate::core::clock::FrameSource;
use crate::core::frames::animation_frames;
use crate::core::sequence::Sequence;
use super::easing::{interpolate, Easing};

/// One interpolation segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TweenSpec {
    /// Value at progress 0.
    pub start: f64,
    /// Value at progress 1, delivered exactly as the last emission.
    pub end: f64,
    /// Duration in the frame source's time units (milliseconds in the browser).
    pub duration: f64,
    /// Easing curve (default: linear).
    #[serde(default)]
    pub easing: Easing,
}

impl TweenSpec {
    /// Create a linear tween, rejecting non-finite values and non-positive durations.
    pub fn new(start: f64, end: f64, duration: f64) -> Result<Self, MotionError> {
        let spec = Self {
            start,
            end,
            duration,
            easing: Easing::Linear,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Check the invariants `new` enforces. Deserialized specs skip `new`,
    /// so builders call this before producing a sequence.
    pub fn validate(&self) -> Result<(), MotionError> {
        ensure_finite("start", self.start)?;
        ensure_finite("end", self.end)?;
        ensure_duration(self.duration)?;
        Ok(())
    }

    /// Normalized progress for an elapsed time. Not clamped.
    #[inline]
    pub fn progress(&self, elapsed: f64) -> f64 {
        elapsed / self.duration
    }

    /// Value at a given progress.
    #[inline]
    pub fn value_at(&self, progress: f64) -> f64 {
        interpolate(self.start, self.end, progress, self.easing)
    }

    /// Build the frame-driven sequence for this tween.
    pub fn sequence(&self, source: Rc<dyn FrameSource>) -> Sequence<f64> {
        let spec = *self;
        animation_frames(source)
            .map(move |sample| spec.progress(sample.elapsed))
            .take_while(|progress| *progress < 1.0)
            .end_with(1.0)
            .map(move |progress| spec.value_at(progress))
    }
}

/// Linear tween from `start` to `end` over `duration`, sampled on `source`.
pub fn tween(
    source: Rc<dyn FrameSource>,
    start: f64,
    end: f64,
    duration: f64,
) -> Result<Sequence<f64>, MotionError> {
    Ok(TweenSpec::new(start, end, duration)?.sequence(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::MotionConfig;
    use crate::core::clock::ManualClock;
    use crate::test_support::Recorder;

    #[test]
    fn samples_at_fixed_times() {
        let clock = Rc::new(ManualClock::new());
        let rec = Recorder::new();
        tween(clock.clone(), 0.0, 200.0, 3600.0)
            .unwrap()
            .subscribe_with(rec.subscriber());

        clock.advance_to(0.0);
        clock.advance_to(1800.0);
        clock.advance_to(3600.0);
        clock.advance_to(3700.0);

        assert_eq!(rec.values(), vec![0.0, 100.0, 200.0]);
        assert!(rec.completed());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn overshooting_frame_is_replaced_by_end() {
        let clock = Rc::new(ManualClock::new());
        let rec = Recorder::new();
        tween(clock.clone(), 10.0, 20.0, 100.0)
            .unwrap()
            .subscribe_with(rec.subscriber());

        clock.advance_to(50.0);
        clock.advance_to(180.0);

        assert_eq!(rec.values(), vec![15.0, 20.0]);
        assert!(rec.completed());
    }

    #[test]
    fn last_value_is_exactly_end() {
        let config = MotionConfig::default();
        for (start, end, duration) in [(0.1, 0.3, 7.0), (-3.3, 1.7, 250.0), (5.0, -5.0, 33.3)] {
            let clock = Rc::new(ManualClock::new());
            let rec = Recorder::new();
            tween(clock.clone(), start, end, duration)
                .unwrap()
                .subscribe_with(rec.subscriber());
            clock.run(&config);
            assert_eq!(rec.last(), Some(end));
            assert_eq!(rec.completions(), 1);
        }
    }

    #[test]
    fn intermediate_values_stay_in_range_and_progress_is_monotonic() {
        let clock = Rc::new(ManualClock::new());
        let rec = Recorder::new();
        let spec = TweenSpec::new(50.0, -50.0, 1000.0).unwrap();
        spec.sequence(clock.clone()).subscribe_with(rec.subscriber());
        clock.run(&MotionConfig::default());

        let values = rec.values();
        let (last, body) = values.split_last().unwrap();
        assert_eq!(*last, -50.0);
        for pair in body.windows(2) {
            // Decreasing tween: progress up means value down.
            assert!(pair[1] <= pair[0]);
        }
        for v in body {
            assert!(*v <= 50.0 && *v > -50.0, "intermediate value {} out of range", v);
        }
    }

    #[test]
    fn eased_tween_still_ends_exactly() {
        let clock = Rc::new(ManualClock::new());
        let rec = Recorder::new();
        TweenSpec::new(0.0, 1.0, 100.0)
            .unwrap()
            .with_easing(Easing::QuadIn)
            .sequence(clock.clone())
            .subscribe_with(rec.subscriber());

        clock.advance_to(50.0);
        clock.advance_to(100.0);
        assert_eq!(rec.values(), vec![0.25, 1.0]);
    }

    #[test]
    fn resubscribing_starts_a_fresh_run() {
        let clock = Rc::new(ManualClock::new());
        let seq = tween(clock.clone(), 0.0, 100.0, 100.0).unwrap();

        let first = Recorder::new();
        seq.subscribe_with(first.subscriber());
        clock.advance_to(50.0);

        let second = Recorder::new();
        seq.subscribe_with(second.subscriber());
        clock.advance_to(75.0);

        assert_eq!(first.values(), vec![50.0, 75.0]);
        assert_eq!(second.values(), vec![25.0]);
    }

    #[test]
    fn unsubscribe_mid_tween_stops_sampling() {
        let clock = Rc::new(ManualClock::new());
        let rec = Recorder::new();
        let sub = tween(clock.clone(), 0.0, 1.0, 100.0)
            .unwrap()
            .subscribe_with(rec.subscriber());
        clock.advance_to(10.0);
        sub.unsubscribe();
        clock.advance_to(200.0);

        assert_eq!(rec.len(), 1);
        assert!(!rec.completed());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn rejects_bad_inputs() {
        let clock: Rc<dyn FrameSource> = Rc::new(ManualClock::new());
        assert!(matches!(
            tween(clock.clone(), 0.0, 1.0, 0.0),
            Err(MotionError::InvalidDuration(_))
        ));
        assert!(matches!(
            tween(clock.clone(), 0.0, 1.0, -10.0),
            Err(MotionError::InvalidDuration(_))
        ));
        assert!(matches!(
            tween(clock, f64::NAN, 1.0, 10.0),
            Err(MotionError::NonFinite { field: "start", .. })
        ));
    }
}
