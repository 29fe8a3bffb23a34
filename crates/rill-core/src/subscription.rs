#![forbid(unsafe_code)]

//! Subscription handles with idempotent teardown.
//!
//! # Invariants
//!
//! 1. `unsubscribe()` runs each registered teardown exactly once, no matter
//!    how many times it is called or how many clones of the handle exist.
//! 2. Teardown added to an already-closed subscription runs immediately
//!    (a resource acquired after synchronous completion must still be
//!    released).
//! 3. Teardowns run synchronously: when `unsubscribe()` returns, everything
//!    the chain acquired has been released.

use std::cell::RefCell;
use std::rc::Rc;

type Teardown = Box<dyn FnOnce()>;

enum State {
    Open(Vec<Teardown>),
    Closed,
}

/// Handle over one active producer run.
///
/// Cloning shares the underlying state: unsubscribing through any clone
/// closes all of them.
pub struct Subscription {
    state: Rc<RefCell<State>>,
}

impl Clone for Subscription {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
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

impl Subscription {
    /// A subscription owning a single teardown closure.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(State::Open(vec![Box::new(teardown)]))),
        }
    }

    /// An open subscription with no teardown work attached yet.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            state: Rc::new(RefCell::new(State::Open(Vec::new()))),
        }
    }

    /// Append teardown work. Runs immediately if already closed.
    pub fn add(&self, teardown: impl FnOnce() + 'static) {
        let run_now = {
            let mut state = self.state.borrow_mut();
            match &mut *state {
                State::Open(list) => {
                    list.push(Box::new(teardown));
                    None
                }
                State::Closed => Some(teardown),
            }
        };
        if let Some(teardown) = run_now {
            teardown();
        }
    }

    /// Tie another subscription's lifetime to this one: unsubscribing `self`
    /// unsubscribes `child`. If `self` is already closed, `child` is
    /// unsubscribed immediately.
    pub fn attach(&self, child: Subscription) {
        self.add(move || child.unsubscribe());
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(&*self.state.borrow(), State::Closed)
    }

    /// Close the subscription, running all registered teardowns. Idempotent.
    pub fn unsubscribe(&self) {
        let teardowns = {
            let mut state = self.state.borrow_mut();
            match std::mem::replace(&mut *state, State::Closed) {
                State::Open(list) => list,
                State::Closed => Vec::new(),
            }
        };
        for teardown in teardowns {
            teardown();
        }
    }
}
