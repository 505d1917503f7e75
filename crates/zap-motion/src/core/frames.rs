use std::cell::Cell;
use std::rc::Rc;

use crate::api::types::{FrameRequest, FrameSample};
use crate::core::clock::FrameSource;
use crate::core::sequence::{Sequence, Subscriber};

/// A never-ending sequence of frame samples from `source`.
///
/// Each subscription records `source.now()` as its start and then emits one
/// `FrameSample` per frame, with `elapsed` measured from that start.
/// Unsubscribing (or completion by a downstream operator) cancels the
/// pending frame request.
pub fn animation_frames(source: Rc<dyn FrameSource>) -> Sequence<FrameSample> {
    Sequence::new(move |subscriber| {
        let frames = Rc::new(FrameLoop {
            source: Rc::clone(&source),
            start: source.now(),
            subscriber: subscriber.clone(),
            pending: Cell::new(None),
        });
        log::debug!("frame loop started at {}", frames.start);

        let teardown = Rc::clone(&frames);
        subscriber.add_teardown(move || teardown.stop());
        frames.schedule();
    })
}

struct FrameLoop {
    source: Rc<dyn FrameSource>,
    start: f64,
    subscriber: Subscriber<FrameSample>,
    pending: Cell<Option<FrameRequest>>,
}

impl FrameLoop {
    fn schedule(self: &Rc<Self>) {
        if self.subscriber.is_closed() {
            return;
        }
        let frames = Rc::clone(self);
        let request = self
            .source
            .request_frame(Box::new(move |timestamp| frames.on_frame(timestamp)));
        self.pending.set(Some(request));
    }

    fn on_frame(self: Rc<Self>, timestamp: f64) {
        self.pending.set(None);
        if self.subscriber.is_closed() {
            return;
        }
        self.subscriber.next(FrameSample {
            timestamp,
            elapsed: (timestamp - self.start).max(0.0),
        });
        self.schedule();
    }

    fn stop(&self) {
        if let Some(request) = self.pending.take() {
            self.source.cancel_frame(request);
        }
        log::debug!("frame loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::test_support::Recorder;

    #[test]
    fn elapsed_is_measured_from_subscribe() {
        let clock = Rc::new(ManualClock::starting_at(1000.0));
        let rec = Recorder::new();
        animation_frames(clock.clone()).subscribe_with(rec.subscriber());

        clock.advance_to(1016.0);
        clock.advance_to(1032.0);

        let samples = rec.values();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp, 1016.0);
        assert_eq!(samples[0].elapsed, 16.0);
        assert_eq!(samples[1].elapsed, 32.0);
    }

    #[test]
    fn elapsed_never_negative() {
        let clock = Rc::new(ManualClock::starting_at(500.0));
        let rec = Recorder::new();
        animation_frames(clock.clone()).subscribe_with(rec.subscriber());

        // A host may report a frame timestamp slightly before subscribe time.
        clock.advance_to(499.0);
        assert_eq!(rec.values()[0].elapsed, 0.0);
    }

    #[test]
    fn unsubscribe_cancels_pending_frame() {
        let clock = Rc::new(ManualClock::new());
        let rec = Recorder::new();
        let sub = animation_frames(clock.clone()).subscribe_with(rec.subscriber());

        clock.advance_by(16.0);
        assert_eq!(clock.pending(), 1);

        sub.unsubscribe();
        assert_eq!(clock.pending(), 0);
        clock.advance_by(16.0);
        assert_eq!(rec.len(), 1);
        assert!(!rec.completed());
    }

    #[test]
    fn each_subscription_has_its_own_start() {
        let clock = Rc::new(ManualClock::new());
        let frames = animation_frames(clock.clone());
        let early = Recorder::new();
        let late = Recorder::new();

        frames.subscribe_with(early.subscriber());
        clock.advance_to(100.0);
        frames.subscribe_with(late.subscriber());
        clock.advance_to(150.0);

        assert_eq!(early.last().unwrap().elapsed, 150.0);
        assert_eq!(late.last().unwrap().elapsed, 50.0);
    }
}
