#![forbid(unsafe_code)]

//! Sequential flattening: `concat_all`.
//!
//! Inner observables are buffered in arrival order and subscribed one at a
//! time; the next inner starts only once the previous one completed. The
//! drain loop is iterative, not recursive, so an arbitrarily long chain of
//! synchronously-completing inners runs in constant stack space.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::StreamError;
use crate::observable::Observable;
use crate::observer::{Observer, ObserverRef};
use crate::subscription::Subscription;

impl<T: 'static> Observable<Observable<T>> {
    /// Flatten a higher-order observable by running inner observables
    /// strictly one after another, in arrival order. Completes once the
    /// outer has completed, the queue is empty, and the last inner has
    /// completed. Unsubscribing tears down the outer subscription, the live
    /// inner subscription, and drops the queue.
    pub fn concat_all(&self) -> Observable<T> {
        let outer = self.clone();
        Observable::new(move |observer| {
            let state = Rc::new(RefCell::new(ConcatState::<T> {
                queue: VecDeque::new(),
                current: None,
                outer_sub: None,
                active: false,
                outer_done: false,
                closed: false,
                draining: false,
            }));

            let outer_sub = outer.subscribe(ConcatOuter {
                state: Rc::clone(&state),
                downstream: observer,
            });
            {
                let mut s = state.borrow_mut();
                if s.closed {
                    drop(s);
                    outer_sub.unsubscribe();
                } else {
                    s.outer_sub = Some(outer_sub);
                }
            }

            let state = Rc::clone(&state);
            Subscription::new(move || {
                let (outer_sub, current) = {
                    let mut s = state.borrow_mut();
                    s.closed = true;
                    s.queue.clear();
                    (s.outer_sub.take(), s.current.take())
                };
                if let Some(sub) = outer_sub {
                    sub.unsubscribe();
                }
                if let Some(sub) = current {
                    sub.unsubscribe();
                }
            })
        })
    }
}

struct ConcatState<T> {
    queue: VecDeque<Observable<T>>,
    current: Option<Subscription>,
    outer_sub: Option<Subscription>,
    /// An inner observable is running (it may not have a `current`
    /// subscription yet while its synchronous part executes).
    active: bool,
    outer_done: bool,
    closed: bool,
    draining: bool,
}

/// Start queued inners until one stays live (or the queue empties). Called
/// after every event that may unblock the sequence; re-entrant calls made
/// while a drain is already on the stack return immediately and let the
/// outer loop continue.
fn drain<T: 'static>(state: &Rc<RefCell<ConcatState<T>>>, downstream: &ObserverRef<T>) {
    {
        let mut s = state.borrow_mut();
        if s.draining {
            return;
        }
        s.draining = true;
    }
    loop {
        let next = {
            let mut s = state.borrow_mut();
            if s.closed || s.active {
                None
            } else if let Some(inner) = s.queue.pop_front() {
                s.active = true;
                Some(inner)
            } else {
                None
            }
        };
        let Some(inner) = next else {
            break;
        };
        let sub = inner.subscribe(ConcatInner {
            state: Rc::clone(state),
            downstream: downstream.clone(),
        });
        let mut s = state.borrow_mut();
        if s.closed {
            drop(s);
            sub.unsubscribe();
        } else if s.active {
            // Inner is still running asynchronously; remember its
            // subscription so teardown can reach it.
            s.current = Some(sub);
        }
        // Otherwise the inner completed synchronously during subscribe; loop
        // on to the next queued inner.
    }
    let all_done = {
        let mut s = state.borrow_mut();
        s.draining = false;
        !s.closed && !s.active && s.outer_done && s.queue.is_empty()
    };
    if all_done {
        downstream.complete();
    }
}

struct ConcatOuter<T> {
    state: Rc<RefCell<ConcatState<T>>>,
    downstream: ObserverRef<T>,
}

impl<T: 'static> Observer<Observable<T>> for ConcatOuter<T> {
    fn next(&mut self, inner: Observable<T>) {
        {
            let mut s = self.state.borrow_mut();
            if s.closed {
                return;
            }
            s.queue.push_back(inner);
        }
        drain(&self.state, &self.downstream);
    }

    fn error(&mut self, reason: StreamError) {
        teardown(&self.state);
        self.downstream.error(reason);
    }

    fn complete(&mut self) {
        let all_done = {
            let mut s = self.state.borrow_mut();
            s.outer_done = true;
            !s.closed && !s.draining && !s.active && s.queue.is_empty()
        };
        if all_done {
            self.downstream.complete();
        }
    }
}

struct ConcatInner<T> {
    state: Rc<RefCell<ConcatState<T>>>,
    downstream: ObserverRef<T>,
}

impl<T: 'static> Observer<T> for ConcatInner<T> {
    fn next(&mut self, value: T) {
        self.downstream.next(value);
    }

    fn error(&mut self, reason: StreamError) {
        teardown(&self.state);
        self.downstream.error(reason);
    }

    fn complete(&mut self) {
        {
            let mut s = self.state.borrow_mut();
            s.active = false;
            s.current = None;
        }
        drain(&self.state, &self.downstream);
    }
}

/// Release outer and inner subscriptions after a stream-level error.
fn teardown<T>(state: &Rc<RefCell<ConcatState<T>>>) {
    let (outer_sub, current) = {
        let mut s = state.borrow_mut();
        s.closed = true;
        s.queue.clear();
        (s.outer_sub.take(), s.current.take())
    };
    if let Some(sub) = outer_sub {
        sub.unsubscribe();
    }
    if let Some(sub) = current {
        sub.unsubscribe();
    }
}
