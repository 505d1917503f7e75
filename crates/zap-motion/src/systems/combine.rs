//! Multi-source combinators.
//!
//! `combine_latest` is the one animation code relies on: a positional tween
//! on one axis and a wave on the other become a single stream of pairs.
//! `merge_with` and `zip_with` follow the same subscription wiring.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::core::sequence::{Sequence, Subscriber};

/// Pair the most recent values of `a` and `b`.
///
/// Nothing is emitted until both sides have produced a value; after that,
/// every value from either side re-emits `(latest_a, latest_b)`. Completes
/// once both sides complete, or as soon as one side completes without ever
/// emitting (no pair can ever be formed).
pub fn combine_latest<A, B>(a: &Sequence<A>, b: &Sequence<B>) -> Sequence<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let a = a.clone();
    let b = b.clone();
    Sequence::new(move |downstream: &Subscriber<(A, B)>| {
        let state = Rc::new(PairSlots::<A, B> {
            a: RefCell::new(None),
            b: RefCell::new(None),
            active: Cell::new(2),
        });

        let (slots, out) = (Rc::clone(&state), downstream.clone());
        let (done_slots, done) = (Rc::clone(&state), downstream.clone());
        let sub_a = Subscriber::new(
            move |v| {
                *slots.a.borrow_mut() = Some(v);
                slots.emit(&out);
            },
            move || {
                let had_value = done_slots.a.borrow().is_some();
                done_slots.side_completed(had_value, &done);
            },
        );

        let (slots, out) = (Rc::clone(&state), downstream.clone());
        let (done_slots, done) = (Rc::clone(&state), downstream.clone());
        let sub_b = Subscriber::new(
            move |v| {
                *slots.b.borrow_mut() = Some(v);
                slots.emit(&out);
            },
            move || {
                let had_value = done_slots.b.borrow().is_some();
                done_slots.side_completed(had_value, &done);
            },
        );

        downstream.add_subscription(sub_a.subscription());
        downstream.add_subscription(sub_b.subscription());
        a.subscribe_with(sub_a);
        b.subscribe_with(sub_b);
    })
}

struct PairSlots<A, B> {
    a: RefCell<Option<A>>,
    b: RefCell<Option<B>>,
    active: Cell<u8>,
}

impl<A: Clone + 'static, B: Clone + 'static> PairSlots<A, B> {
    fn emit(&self, out: &Subscriber<(A, B)>) {
        let pair = match (&*self.a.borrow(), &*self.b.borrow()) {
            (Some(a), Some(b)) => Some((a.clone(), b.clone())),
            _ => None,
        };
        if let Some(pair) = pair {
            out.next(pair);
        }
    }

    fn side_completed(&self, had_value: bool, out: &Subscriber<(A, B)>) {
        self.active.set(self.active.get().saturating_sub(1));
        if !had_value || self.active.get() == 0 {
            out.complete();
        }
    }
}

/// Latest-value pairing across any number of sequences of one type.
pub fn combine_latest_all<T: Clone + 'static>(sources: Vec<Sequence<T>>) -> Sequence<Vec<T>> {
    let sources: Rc<[Sequence<T>]> = sources.into();
    Sequence::new(move |downstream: &Subscriber<Vec<T>>| {
        if sources.is_empty() {
            downstream.complete();
            return;
        }
        let slots: Rc<RefCell<Vec<Option<T>>>> = Rc::new(RefCell::new(vec![None; sources.len()]));
        let active = Rc::new(Cell::new(sources.len()));

        let mut upstreams = Vec::with_capacity(sources.len());
        for idx in 0..sources.len() {
            let (values, out) = (Rc::clone(&slots), downstream.clone());
            let (done_values, done, remaining) =
                (Rc::clone(&slots), downstream.clone(), Rc::clone(&active));
            let upstream = Subscriber::new(
                move |v| {
                    let snapshot = {
                        let mut values = values.borrow_mut();
                        values[idx] = Some(v);
                        values.iter().cloned().collect::<Option<Vec<T>>>()
                    };
                    if let Some(snapshot) = snapshot {
                        out.next(snapshot);
                    }
                },
                move || {
                    remaining.set(remaining.get() - 1);
                    let had_value = done_values.borrow()[idx].is_some();
                    if !had_value || remaining.get() == 0 {
                        done.complete();
                    }
                },
            );
            downstream.add_subscription(upstream.subscription());
            upstreams.push(upstream);
        }

        for (source, upstream) in sources.iter().zip(upstreams) {
            if downstream.is_closed() {
                break;
            }
            source.subscribe_with(upstream);
        }
    })
}

impl<T: Clone + 'static> Sequence<T> {
    /// Method form of [`combine_latest`].
    pub fn combine_latest_with<U: Clone + 'static>(&self, other: &Sequence<U>) -> Sequence<(T, U)> {
        combine_latest(self, other)
    }
}

impl<T: 'static> Sequence<T> {
    /// Interleave values from both sequences as they arrive.
    /// Completes when both have completed.
    pub fn merge_with(&self, other: &Sequence<T>) -> Sequence<T> {
        let sources = [self.clone(), other.clone()];
        Sequence::new(move |downstream: &Subscriber<T>| {
            let active = Rc::new(Cell::new(sources.len()));
            let upstreams: Vec<Subscriber<T>> = sources
                .iter()
                .map(|_| {
                    let out = downstream.clone();
                    let done = downstream.clone();
                    let remaining = Rc::clone(&active);
                    let upstream = Subscriber::new(
                        move |v| out.next(v),
                        move || {
                            remaining.set(remaining.get() - 1);
                            if remaining.get() == 0 {
                                done.complete();
                            }
                        },
                    );
                    downstream.add_subscription(upstream.subscription());
                    upstream
                })
                .collect();
            for (source, upstream) in sources.iter().zip(upstreams) {
                source.subscribe_with(upstream);
            }
        })
    }

    /// Pair values by position: the n-th of each side.
    /// Completes once a finished side has nothing left buffered.
    pub fn zip_with<U: 'static>(&self, other: &Sequence<U>) -> Sequence<(T, U)> {
        let left = self.clone();
        let right = other.clone();
        Sequence::new(move |downstream: &Subscriber<(T, U)>| {
            let state = Rc::new(ZipBuffers::<T, U> {
                left: RefCell::new(VecDeque::new()),
                right: RefCell::new(VecDeque::new()),
                left_done: Cell::new(false),
                right_done: Cell::new(false),
            });

            let (buf, out) = (Rc::clone(&state), downstream.clone());
            let (done_buf, done) = (Rc::clone(&state), downstream.clone());
            let sub_left = Subscriber::new(
                move |v| {
                    buf.left.borrow_mut().push_back(v);
                    buf.drain(&out);
                },
                move || {
                    done_buf.left_done.set(true);
                    done_buf.drain(&done);
                },
            );

            let (buf, out) = (Rc::clone(&state), downstream.clone());
            let (done_buf, done) = (Rc::clone(&state), downstream.clone());
            let sub_right = Subscriber::new(
                move |v| {
                    buf.right.borrow_mut().push_back(v);
                    buf.drain(&out);
                },
                move || {
                    done_buf.right_done.set(true);
                    done_buf.drain(&done);
                },
            );

            downstream.add_subscription(sub_left.subscription());
            downstream.add_subscription(sub_right.subscription());
            left.subscribe_with(sub_left);
            right.subscribe_with(sub_right);
        })
    }
}

struct ZipBuffers<T, U> {
    left: RefCell<VecDeque<T>>,
    right: RefCell<VecDeque<U>>,
    left_done: Cell<bool>,
    right_done: Cell<bool>,
}

impl<T: 'static, U: 'static> ZipBuffers<T, U> {
    fn drain(&self, out: &Subscriber<(T, U)>) {
        loop {
            let pair = {
                let mut left = self.left.borrow_mut();
                let mut right = self.right.borrow_mut();
                if left.is_empty() || right.is_empty() {
                    None
                } else {
                    left.pop_front().zip(right.pop_front())
                }
            };
            match pair {
                Some(pair) => out.next(pair),
                None => break,
            }
        }
        let left_exhausted = self.left_done.get() && self.left.borrow().is_empty();
        let right_exhausted = self.right_done.get() && self.right.borrow().is_empty();
        if left_exhausted || right_exhausted {
            out.complete();
        }
    }
}
