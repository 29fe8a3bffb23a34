#![forbid(unsafe_code)]

//! Latest-wins flattening: `switch_all`.
//!
//! At most one inner observable is active. Every inner emitted by the outer
//! replaces the previous one, tearing its subscription down first. Inner
//! runs are tagged with an epoch so a replaced inner's synchronous tail can
//! never leak values into the switched stream.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::StreamError;
use crate::observable::Observable;
use crate::observer::{Observer, ObserverRef};
use crate::subscription::Subscription;

impl<T: 'static> Observable<Observable<T>> {
    /// Flatten a higher-order observable by forwarding only the most
    /// recently emitted inner observable. Completes once the outer has
    /// completed and the active inner (if any) has completed.
    pub fn switch_all(&self) -> Observable<T> {
        let outer = self.clone();
        Observable::new(move |observer| {
            let state = Rc::new(RefCell::new(SwitchState {
                current: None,
                outer_sub: None,
                epoch: 0,
                has_active: false,
                outer_done: false,
                closed: false,
            }));

            let outer_sub = outer.subscribe(SwitchOuter {
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

struct SwitchState {
    current: Option<Subscription>,
    outer_sub: Option<Subscription>,
    /// Bumped on every replacement; signals from stale inners are dropped.
    epoch: u64,
    has_active: bool,
    outer_done: bool,
    closed: bool,
}

struct SwitchOuter<T> {
    state: Rc<RefCell<SwitchState>>,
    downstream: ObserverRef<T>,
}

impl<T: 'static> Observer<Observable<T>> for SwitchOuter<T> {
    fn next(&mut self, inner: Observable<T>) {
        let (previous, epoch) = {
            let mut s = self.state.borrow_mut();
            if s.closed {
                return;
            }
            s.epoch += 1;
            s.has_active = true;
            (s.current.take(), s.epoch)
        };
        if let Some(sub) = previous {
            sub.unsubscribe();
        }
        let sub = inner.subscribe(SwitchInner {
            state: Rc::clone(&self.state),
            downstream: self.downstream.clone(),
            epoch,
        });
        let mut s = self.state.borrow_mut();
        if s.closed || s.epoch != epoch || !s.has_active {
            // Torn down, replaced, or completed during its synchronous run.
            drop(s);
            sub.unsubscribe();
        } else {
            s.current = Some(sub);
        }
    }

    fn error(&mut self, reason: StreamError) {
        teardown(&self.state);
        self.downstream.error(reason);
    }

    fn complete(&mut self) {
        let all_done = {
            let mut s = self.state.borrow_mut();
            s.outer_done = true;
            !s.closed && !s.has_active
        };
        if all_done {
            self.downstream.complete();
        }
    }
}

struct SwitchInner<T> {
    state: Rc<RefCell<SwitchState>>,
    downstream: ObserverRef<T>,
    epoch: u64,
}

impl<T> SwitchInner<T> {
    fn is_stale(&self) -> bool {
        let s = self.state.borrow();
        s.closed || s.epoch != self.epoch
    }
}

impl<T: 'static> Observer<T> for SwitchInner<T> {
    fn next(&mut self, value: T) {
        if self.is_stale() {
            return;
        }
        self.downstream.next(value);
    }

    fn error(&mut self, reason: StreamError) {
        if self.is_stale() {
            return;
        }
        teardown(&self.state);
        self.downstream.error(reason);
    }

    fn complete(&mut self) {
        let all_done = {
            let mut s = self.state.borrow_mut();
            if s.closed || s.epoch != self.epoch {
                return;
            }
            s.has_active = false;
            s.current = None;
            s.outer_done
        };
        if all_done {
            self.downstream.complete();
        }
    }
}

fn teardown(state: &Rc<RefCell<SwitchState>>) {
    let (outer_sub, current) = {
        let mut s = state.borrow_mut();
        s.closed = true;
        (s.outer_sub.take(), s.current.take())
    };
    if let Some(sub) = outer_sub {
        sub.unsubscribe();
    }
    if let Some(sub) = current {
        sub.unsubscribe();
    }
}
