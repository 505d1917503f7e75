//! Lazy push sequences.
//!
//! A `Sequence<T>` is a recipe: nothing runs until `subscribe` is called, and
//! every subscription runs the producer again with its own state. Values are
//! pushed synchronously into a `Subscriber<T>`; the `Subscription` returned to
//! the caller cancels the run and releases whatever the producer registered
//! as teardown (pending frame requests, upstream subscriptions).
//!
//! Everything here is single-threaded (`Rc`/`RefCell`), matching a host that
//! drives all work from one frame callback.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Teardown = Box<dyn FnOnce()>;

/// Cancellation handle for one subscription.
///
/// Cloning shares the handle. `unsubscribe` is idempotent: teardown runs once,
/// in registration order.
#[derive(Clone, Default)]
pub struct Subscription {
    inner: Rc<SubscriptionInner>,
}

#[derive(Default)]
struct SubscriptionInner {
    closed: Cell<bool>,
    teardown: RefCell<Vec<Teardown>>,
}

impl Subscription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this subscription has been cancelled or has completed.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    /// Register work to run on unsubscribe. Runs immediately if already closed.
    pub fn add_teardown(&self, teardown: impl FnOnce() + 'static) {
        if self.is_closed() {
            teardown();
            return;
        }
        self.inner.teardown.borrow_mut().push(Box::new(teardown));
    }

    /// Close `child` when this subscription closes.
    pub fn add(&self, child: Subscription) {
        self.add_teardown(move || child.unsubscribe());
    }

    /// Stop the run and release its resources.
    pub fn unsubscribe(&self) {
        if self.inner.closed.replace(true) {
            return;
        }
        // Taking the list out drops the teardown closures (and any cycles
        // they hold) even if one of them re-enters this subscription.
        let teardown = std::mem::take(&mut *self.inner.teardown.borrow_mut());
        for f in teardown {
            f();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Receiving end of a sequence run.
///
/// Cheap to clone; clones feed the same handlers. Once completed or
/// unsubscribed, further `next`/`complete` calls are ignored.
pub struct Subscriber<T> {
    inner: Rc<SubscriberInner<T>>,
}

struct SubscriberInner<T> {
    on_next: RefCell<Box<dyn FnMut(T)>>,
    on_complete: Cell<Option<Box<dyn FnOnce()>>>,
    stopped: Cell<bool>,
    subscription: Subscription,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Subscriber<T> {
    pub fn new(on_next: impl FnMut(T) + 'static, on_complete: impl FnOnce() + 'static) -> Self {
        Self {
            inner: Rc::new(SubscriberInner {
                on_next: RefCell::new(Box::new(on_next)),
                on_complete: Cell::new(Some(Box::new(on_complete))),
                stopped: Cell::new(false),
                subscription: Subscription::new(),
            }),
        }
    }

    /// A subscriber that only cares about values.
    pub fn on_next(on_next: impl FnMut(T) + 'static) -> Self {
        Self::new(on_next, || {})
    }

    /// Push a value downstream.
    pub fn next(&self, value: T) {
        if self.is_closed() {
            return;
        }
        match self.inner.on_next.try_borrow_mut() {
            Ok(mut on_next) => on_next(value),
            Err(_) => log::warn!("re-entrant emission into the same subscriber dropped"),
        }
    }

    /// Signal the end of the sequence, then release the run's resources.
    pub fn complete(&self) {
        if self.is_closed() {
            return;
        }
        self.inner.stopped.set(true);
        if let Some(on_complete) = self.inner.on_complete.take() {
            on_complete();
        }
        self.inner.subscription.unsubscribe();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.stopped.get() || self.inner.subscription.is_closed()
    }

    /// The handle that cancels this run.
    pub fn subscription(&self) -> Subscription {
        self.inner.subscription.clone()
    }

    pub fn add_teardown(&self, teardown: impl FnOnce() + 'static) {
        self.inner.subscription.add_teardown(teardown);
    }

    /// Close an upstream subscription whenever this subscriber closes.
    pub fn add_subscription(&self, upstream: Subscription) {
        self.inner.subscription.add(upstream);
    }
}

type Producer<T> = dyn Fn(&Subscriber<T>);

/// A cold, restartable sequence of values.
pub struct Sequence<T> {
    producer: Rc<Producer<T>>,
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Self {
            producer: Rc::clone(&self.producer),
        }
    }
}

impl<T: 'static> Sequence<T> {
    /// Build a sequence from a producer.
    ///
    /// The producer is called once per subscription. It pushes values into
    /// the subscriber (now or later) and registers teardown on it.
    pub fn new(producer: impl Fn(&Subscriber<T>) + 'static) -> Self {
        Self {
            producer: Rc::new(producer),
        }
    }

    /// Start a run with plain callbacks.
    pub fn subscribe(
        &self,
        on_next: impl FnMut(T) + 'static,
        on_complete: impl FnOnce() + 'static,
    ) -> Subscription {
        self.subscribe_with(Subscriber::new(on_next, on_complete))
    }

    /// Start a run feeding an existing subscriber.
    pub fn subscribe_with(&self, subscriber: Subscriber<T>) -> Subscription {
        let subscription = subscriber.subscription();
        if !subscription.is_closed() {
            (self.producer)(&subscriber);
        }
        subscription
    }
}

/// Emit every item synchronously on subscribe, then complete.
pub fn from_iter<I>(items: I) -> Sequence<I::Item>
where
    I: IntoIterator,
    I::IntoIter: Clone + 'static,
    I::Item: 'static,
{
    let items = items.into_iter();
    Sequence::new(move |subscriber| {
        for item in items.clone() {
            if subscriber.is_closed() {
                return;
            }
            subscriber.next(item);
        }
        subscriber.complete();
    })
}

/// Emit the given values synchronously, then complete.
pub fn of<T: Clone + 'static>(values: Vec<T>) -> Sequence<T> {
    from_iter(values)
}

/// Complete immediately without emitting.
pub fn empty<T: 'static>() -> Sequence<T> {
    Sequence::new(|subscriber: &Subscriber<T>| subscriber.complete())
}
