use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::sequence::Subscriber;

/// Collects everything a sequence pushes, for assertions.
pub struct Recorder<T> {
    values: Rc<RefCell<Vec<T>>>,
    completions: Rc<Cell<u32>>,
}

impl<T: Clone + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            values: Rc::new(RefCell::new(Vec::new())),
            completions: Rc::new(Cell::new(0)),
        }
    }

    pub fn subscriber(&self) -> Subscriber<T> {
        let values = Rc::clone(&self.values);
        let completions = Rc::clone(&self.completions);
        Subscriber::new(
            move |v| values.borrow_mut().push(v),
            move || completions.set(completions.get() + 1),
        )
    }

    pub fn values(&self) -> Vec<T> {
        self.values.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn last(&self) -> Option<T> {
        self.values.borrow().last().cloned()
    }

    pub fn completed(&self) -> bool {
        self.completions.get() > 0
    }

    pub fn completions(&self) -> u32 {
        self.completions.get()
    }
}
