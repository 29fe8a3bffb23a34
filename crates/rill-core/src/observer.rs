#![forbid(unsafe_code)]

//! Observer capability set and the shared delivery handle.
//!
//! # Invariants
//!
//! 1. Once `complete()` or `error()` has been delivered through an
//!    [`ObserverRef`], every later signal through that handle is dropped.
//! 2. `error` and `complete` are mutually exclusive: whichever is delivered
//!    first is terminal.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::StreamError;

/// Capability set a subscriber presents to a producer.
///
/// `error` and `complete` default to no-ops so value-only observers stay
/// terse.
pub trait Observer<T> {
    fn next(&mut self, value: T);

    fn error(&mut self, reason: StreamError) {
        let _ = reason;
    }

    fn complete(&mut self) {}
}

/// Closure-backed [`Observer`].
pub struct FnObserver<T> {
    on_next: Box<dyn FnMut(T)>,
    on_error: Option<Box<dyn FnMut(StreamError)>>,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl<T> FnObserver<T> {
    /// Observer that only cares about values.
    pub fn next(on_next: impl FnMut(T) + 'static) -> Self {
        Self {
            on_next: Box::new(on_next),
            on_error: None,
            on_complete: None,
        }
    }

    /// Observer with all three callbacks.
    pub fn all(
        on_next: impl FnMut(T) + 'static,
        on_error: impl FnMut(StreamError) + 'static,
        on_complete: impl FnMut() + 'static,
    ) -> Self {
        Self {
            on_next: Box::new(on_next),
            on_error: Some(Box::new(on_error)),
            on_complete: Some(Box::new(on_complete)),
        }
    }
}

impl<T> Observer<T> for FnObserver<T> {
    fn next(&mut self, value: T) {
        (self.on_next)(value);
    }

    fn error(&mut self, reason: StreamError) {
        if let Some(on_error) = &mut self.on_error {
            on_error(reason);
        }
    }

    fn complete(&mut self) {
        if let Some(on_complete) = &mut self.on_complete {
            on_complete();
        }
    }
}

/// Shared, terminal-guarded handle through which producers deliver signals.
///
/// Producers and operators hold clones of the same handle; the terminal flag
/// is shared, so a `complete()` from any clone silences all of them. This is
/// what enforces the "nothing after terminal" invariant for a subscription.
pub struct ObserverRef<T> {
    target: Rc<RefCell<dyn Observer<T>>>,
    done: Rc<Cell<bool>>,
}

impl<T> Clone for ObserverRef<T> {
    fn clone(&self) -> Self {
        Self {
            target: Rc::clone(&self.target),
            done: Rc::clone(&self.done),
        }
    }
}

impl<T: 'static> ObserverRef<T> {
    pub(crate) fn new(observer: impl Observer<T> + 'static) -> Self {
        Self {
            target: Rc::new(RefCell::new(observer)),
            done: Rc::new(Cell::new(false)),
        }
    }

    pub fn next(&self, value: T) {
        if self.done.get() {
            return;
        }
        self.target.borrow_mut().next(value);
    }

    pub fn error(&self, reason: StreamError) {
        if self.done.replace(true) {
            return;
        }
        self.target.borrow_mut().error(reason);
    }

    pub fn complete(&self) {
        if self.done.replace(true) {
            return;
        }
        self.target.borrow_mut().complete();
    }

    /// Whether a terminal signal has already been delivered.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done.get()
    }
}
