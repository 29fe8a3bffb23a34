#![forbid(unsafe_code)]

//! Hot multicast signal.
//!
//! A [`Subject`] is the bridge from imperative call sites into the stream
//! world: one producer pushes values with [`next`](Subject::next), and every
//! observable obtained from [`as_observable`](Subject::as_observable) sees
//! them live. Unlike cold observables there is no replay; a subscriber only
//! receives values pushed after it subscribed.
//!
//! # Invariants
//!
//! 1. Observers are notified in registration order.
//! 2. The observer list is snapshotted before delivery, so a callback may
//!    subscribe or unsubscribe mid-notification without skipping or
//!    double-delivering.
//! 3. After [`complete`](Subject::complete), later subscribers complete
//!    immediately and later `next` calls are dropped.

use std::cell::RefCell;
use std::rc::Rc;

use crate::observable::Observable;
use crate::observer::ObserverRef;
use crate::subscription::Subscription;

struct SubjectInner<T> {
    next_id: u64,
    done: bool,
    observers: Vec<(u64, ObserverRef<T>)>,
}

/// Shared, hot, multicast stream head.
pub struct Subject<T> {
    inner: Rc<RefCell<SubjectInner<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SubjectInner {
                next_id: 0,
                done: false,
                observers: Vec::new(),
            })),
        }
    }

    /// Deliver a clone of `value` to every registered observer, in
    /// registration order. Dropped once the subject has completed.
    pub fn next(&self, value: T) {
        let observers: Vec<ObserverRef<T>> = {
            let inner = self.inner.borrow();
            if inner.done {
                return;
            }
            inner.observers.iter().map(|(_, o)| o.clone()).collect()
        };
        for observer in observers {
            observer.next(value.clone());
        }
    }

    /// Complete every registered observer and drop the registration list.
    pub fn complete(&self) {
        let observers: Vec<ObserverRef<T>> = {
            let mut inner = self.inner.borrow_mut();
            if inner.done {
                return;
            }
            inner.done = true;
            inner.observers.drain(..).map(|(_, o)| o).collect()
        };
        for observer in observers {
            observer.complete();
        }
    }

    /// Number of currently registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    /// A cold wrapper around this hot source: subscribing registers with the
    /// subject, teardown unregisters.
    #[must_use]
    pub fn as_observable(&self) -> Observable<T> {
        let inner = Rc::clone(&self.inner);
        Observable::new(move |observer| {
            let id = {
                let mut inner = inner.borrow_mut();
                if inner.done {
                    None
                } else {
                    let id = inner.next_id;
                    inner.next_id += 1;
                    inner.observers.push((id, observer.clone()));
                    Some(id)
                }
            };
            let Some(id) = id else {
                observer.complete();
                return Subscription::empty();
            };
            let inner = Rc::clone(&inner);
            Subscription::new(move || {
                inner.borrow_mut().observers.retain(|(i, _)| *i != id);
            })
        })
    }
}
