//! Sequential concatenation.
//!
//! Segments run strictly one after another: segment `i + 1` is subscribed
//! only from segment `i`'s completion signal, so every value of `i` has
//! already been delivered.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::sequence::{Sequence, Subscriber, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConcatState {
    Idle,
    Running(u64),
    Done,
}

type SegmentFactory<T> = dyn Fn(u64) -> Sequence<T>;

/// Run `segments` back to back, completing after the last one.
pub fn concat<T: 'static>(segments: Vec<Sequence<T>>) -> Sequence<T> {
    let segments: Rc<[Sequence<T>]> = segments.into();
    let count = segments.len() as u64;
    concat_indexed(count, move |i| segments[i as usize].clone())
}

/// Run `count` segments back to back, building segment `i` only when it
/// starts. Nothing is allocated per segment up front.
pub fn concat_indexed<T: 'static>(
    count: u64,
    segment: impl Fn(u64) -> Sequence<T> + 'static,
) -> Sequence<T> {
    let segment: Rc<SegmentFactory<T>> = Rc::new(segment);
    Sequence::new(move |downstream: &Subscriber<T>| {
        let run = Rc::new(ConcatRun {
            count,
            segment: Rc::clone(&segment),
            downstream: downstream.clone(),
            state: Cell::new(ConcatState::Idle),
            current: RefCell::new(None),
        });
        let teardown = Rc::clone(&run);
        downstream.add_teardown(move || teardown.cancel());
        run.advance();
    })
}

impl<T: 'static> Sequence<T> {
    /// Append `next` after this sequence completes.
    pub fn concat_with(&self, next: &Sequence<T>) -> Sequence<T> {
        concat(vec![self.clone(), next.clone()])
    }
}

struct ConcatRun<T> {
    count: u64,
    segment: Rc<SegmentFactory<T>>,
    downstream: Subscriber<T>,
    state: Cell<ConcatState>,
    current: RefCell<Option<Subscription>>,
}

impl<T: 'static> ConcatRun<T> {
    fn advance(self: &Rc<Self>) {
        let next = match self.state.get() {
            ConcatState::Idle => 0,
            ConcatState::Running(i) => i + 1,
            ConcatState::Done => return,
        };
        if self.downstream.is_closed() {
            self.state.set(ConcatState::Done);
            return;
        }
        if next >= self.count {
            self.state.set(ConcatState::Done);
            self.downstream.complete();
            return;
        }

        self.state.set(ConcatState::Running(next));
        log::debug!("concat: segment {} of {}", next + 1, self.count);

        let out = self.downstream.clone();
        let run = Rc::clone(self);
        let inner = Subscriber::new(move |v| out.next(v), move || run.advance());
        *self.current.borrow_mut() = Some(inner.subscription());
        (self.segment)(next).subscribe_with(inner);
    }

    fn cancel(&self) {
        self.state.set(ConcatState::Done);
        if let Some(current) = self.current.borrow_mut().take() {
            current.unsubscribe();
        }
    }
}
