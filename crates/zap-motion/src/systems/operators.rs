//! Single-source operators: map, filter, take, take_while, end_with.
//!
//! Each operator subscribes upstream with its own subscriber and ties the
//! upstream subscription to the downstream one, so completing or cancelling
//! downstream always releases upstream (and its frame request).

use std::cell::Cell;
use std::rc::Rc;

use crate::core::sequence::{Sequence, Subscriber};

impl<T: 'static> Sequence<T> {
    /// Transform every value.
    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + 'static) -> Sequence<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Sequence::new(move |downstream: &Subscriber<U>| {
            let f = Rc::clone(&f);
            let out = downstream.clone();
            let done = downstream.clone();
            let upstream = Subscriber::new(move |v| out.next(f(v)), move || done.complete());
            downstream.add_subscription(upstream.subscription());
            source.subscribe_with(upstream);
        })
    }

    /// Keep only values matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Sequence<T> {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Sequence::new(move |downstream: &Subscriber<T>| {
            let predicate = Rc::clone(&predicate);
            let out = downstream.clone();
            let done = downstream.clone();
            let upstream = Subscriber::new(
                move |v| {
                    if predicate(&v) {
                        out.next(v);
                    }
                },
                move || done.complete(),
            );
            downstream.add_subscription(upstream.subscription());
            source.subscribe_with(upstream);
        })
    }

    /// Emit at most `count` values, then complete.
    pub fn take(&self, count: usize) -> Sequence<T> {
        let source = self.clone();
        Sequence::new(move |downstream: &Subscriber<T>| {
            if count == 0 {
                downstream.complete();
                return;
            }
            let seen = Cell::new(0usize);
            let out = downstream.clone();
            let done = downstream.clone();
            let upstream = Subscriber::new(
                move |v| {
                    seen.set(seen.get() + 1);
                    out.next(v);
                    if seen.get() >= count {
                        out.complete();
                    }
                },
                move || done.complete(),
            );
            downstream.add_subscription(upstream.subscription());
            source.subscribe_with(upstream);
        })
    }

    /// Emit values while `predicate` holds. The first failing value is
    /// dropped and the sequence completes.
    pub fn take_while(&self, predicate: impl Fn(&T) -> bool + 'static) -> Sequence<T> {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Sequence::new(move |downstream: &Subscriber<T>| {
            let predicate = Rc::clone(&predicate);
            let out = downstream.clone();
            let done = downstream.clone();
            let upstream = Subscriber::new(
                move |v| {
                    if predicate(&v) {
                        out.next(v);
                    } else {
                        out.complete();
                    }
                },
                move || done.complete(),
            );
            downstream.add_subscription(upstream.subscription());
            source.subscribe_with(upstream);
        })
    }

    /// Emit `last` after upstream completes, then complete.
    pub fn end_with(&self, last: T) -> Sequence<T>
    where
        T: Clone,
    {
        let source = self.clone();
        Sequence::new(move |downstream: &Subscriber<T>| {
            let last = last.clone();
            let out = downstream.clone();
            let done = downstream.clone();
            let upstream = Subscriber::new(
                move |v| out.next(v),
                move || {
                    done.next(last);
                    done.complete();
                },
            );
            downstream.add_subscription(upstream.subscription());
            source.subscribe_with(upstream);
        })
    }
}
