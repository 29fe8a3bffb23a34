#![forbid(unsafe_code)]

//! Virtual-time timer driver.
//!
//! Time-based sources never touch wall-clock timers directly; they register
//! periodic callbacks here and the host (or a test) drives the clock with
//! [`Scheduler::advance`]. This keeps every time-dependent pipeline
//! deterministic and single-threaded.
//!
//! # Invariants
//!
//! 1. Timers fire in due-time order; ties break by registration order.
//! 2. `now()` equals a timer's due instant while its callback runs.
//! 3. A callback may cancel or register timers mid-advance; cancellations
//!    take effect before the next fire is selected.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Identifies one registered timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct TimerEntry {
    id: u64,
    due: Duration,
    period: Duration,
    callback: Rc<dyn Fn()>,
}

struct SchedulerInner {
    now: Duration,
    next_id: u64,
    timers: Vec<TimerEntry>,
}

/// Cloneable handle to a shared virtual clock.
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                now: Duration::ZERO,
                next_id: 0,
                timers: Vec::new(),
            })),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of live timer registrations. Zero after every pipeline using
    /// this scheduler has been unsubscribed.
    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Register a repeating callback, first firing one full `period` from
    /// now.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero: a zero-period timer would fire forever
    /// within a single `advance`.
    pub fn schedule_periodic(&self, period: Duration, callback: impl Fn() + 'static) -> TimerId {
        assert!(!period.is_zero(), "periodic timer period must be non-zero");
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let due = inner.now + period;
        inner.timers.push(TimerEntry {
            id,
            due,
            period,
            callback: Rc::new(callback),
        });
        TimerId(id)
    }

    /// Remove a timer. Unknown ids are ignored (cancellation is idempotent).
    pub fn cancel(&self, id: TimerId) {
        self.inner.borrow_mut().timers.retain(|t| t.id != id.0);
    }

    /// Advance the clock by `dt`, firing every timer that comes due, in
    /// order. The borrow on internal state is released before each callback
    /// runs, so callbacks may schedule or cancel freely.
    pub fn advance(&self, dt: Duration) {
        let target = self.inner.borrow().now + dt;
        loop {
            let next = {
                let inner = self.inner.borrow();
                inner
                    .timers
                    .iter()
                    .filter(|t| t.due <= target)
                    .min_by_key(|t| (t.due, t.id))
                    .map(|t| (t.id, t.due, Rc::clone(&t.callback)))
            };
            let Some((id, due, callback)) = next else {
                break;
            };
            {
                let mut inner = self.inner.borrow_mut();
                inner.now = due;
                if let Some(entry) = inner.timers.iter_mut().find(|t| t.id == id) {
                    entry.due = due + entry.period;
                }
            }
            callback();
        }
        self.inner.borrow_mut().now = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fires_after_full_period() {
        let scheduler = Scheduler::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        scheduler.schedule_periodic(Duration::from_millis(50), move || {
            count_clone.set(count_clone.get() + 1);
        });

        scheduler.advance(Duration::from_millis(25));
        assert_eq!(count.get(), 0);
        scheduler.advance(Duration::from_millis(25));
        assert_eq!(count.get(), 1);
        scheduler.advance(Duration::from_millis(100));
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn cancel_stops_firing() {
        let scheduler = Scheduler::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let id = scheduler.schedule_periodic(Duration::from_millis(10), move || {
            count_clone.set(count_clone.get() + 1);
        });

        scheduler.advance(Duration::from_millis(35));
        assert_eq!(count.get(), 3);

        scheduler.cancel(id);
        assert_eq!(scheduler.active_timers(), 0);
        scheduler.advance(Duration::from_millis(100));
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn interleaves_timers_by_due_time() {
        let scheduler = Scheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let order_a = Rc::clone(&order);
        scheduler.schedule_periodic(Duration::from_millis(30), move || {
            order_a.borrow_mut().push('a');
        });
        let order_b = Rc::clone(&order);
        scheduler.schedule_periodic(Duration::from_millis(20), move || {
            order_b.borrow_mut().push('b');
        });

        scheduler.advance(Duration::from_millis(60));
        // b @ 20, a @ 30, b @ 40, a @ 60, b @ 60 (a registered first, ties
        // break by registration order).
        assert_eq!(*order.borrow(), vec!['b', 'a', 'b', 'a', 'b']);
    }

    #[test]
    fn callback_may_cancel_its_own_timer() {
        let scheduler = Scheduler::new();
        let count = Rc::new(Cell::new(0u32));

        let scheduler_handle = scheduler.clone();
        let count_clone = Rc::clone(&count);
        let id_cell: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
        let id_for_cb = Rc::clone(&id_cell);
        let id = scheduler.schedule_periodic(Duration::from_millis(10), move || {
            count_clone.set(count_clone.get() + 1);
            if count_clone.get() == 2 {
                if let Some(id) = id_for_cb.get() {
                    scheduler_handle.cancel(id);
                }
            }
        });
        id_cell.set(Some(id));

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn now_tracks_advances() {
        let scheduler = Scheduler::new();
        assert_eq!(scheduler.now(), Duration::ZERO);
        scheduler.advance(Duration::from_millis(42));
        assert_eq!(scheduler.now(), Duration::from_millis(42));
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn zero_period_is_rejected() {
        let scheduler = Scheduler::new();
        scheduler.schedule_periodic(Duration::ZERO, || {});
    }
}
