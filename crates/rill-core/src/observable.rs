#![forbid(unsafe_code)]

//! The cold observable primitive and its creation operators.
//!
//! An [`Observable`] is an immutable description of a producer process: a
//! function from an observer to a [`Subscription`]. Construction is
//! side-effect-free; the producer runs only inside
//! [`subscribe`](Observable::subscribe), once per subscription.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::error::StreamError;
use crate::observer::{FnObserver, Observer, ObserverRef};
use crate::scheduler::Scheduler;
use crate::subscription::Subscription;

/// A lazy, push-based stream of `T` values.
///
/// Cloning shares the producer description, never any run state: two clones
/// subscribed independently produce two independent runs (cold semantics).
pub struct Observable<T> {
    producer: Rc<dyn Fn(ObserverRef<T>) -> Subscription>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            producer: Rc::clone(&self.producer),
        }
    }
}

impl<T: 'static> Observable<T> {
    /// Wrap a producer function. No work happens here.
    pub fn new(producer: impl Fn(ObserverRef<T>) -> Subscription + 'static) -> Self {
        Self {
            producer: Rc::new(producer),
        }
    }

    /// Run the producer synchronously with `observer`, returning the
    /// producer's subscription.
    pub fn subscribe(&self, observer: impl Observer<T> + 'static) -> Subscription {
        (self.producer)(ObserverRef::new(observer))
    }

    /// Subscribe with a value-only callback; `error` and `complete` are
    /// ignored.
    pub fn subscribe_next(&self, on_next: impl FnMut(T) + 'static) -> Subscription {
        self.subscribe(FnObserver::next(on_next))
    }

    /// Subscribe with all three callbacks.
    pub fn subscribe_all(
        &self,
        on_next: impl FnMut(T) + 'static,
        on_error: impl FnMut(StreamError) + 'static,
        on_complete: impl FnMut() + 'static,
    ) -> Subscription {
        self.subscribe(FnObserver::all(on_next, on_error, on_complete))
    }

    /// A stream that completes immediately without emitting.
    #[must_use]
    pub fn empty() -> Self {
        Observable::new(|observer| {
            observer.complete();
            Subscription::empty()
        })
    }

    /// Deliver every value synchronously in order, then complete. An empty
    /// input completes immediately.
    ///
    /// Values are captured once and cloned per subscription, so a single
    /// `of` observable can be subscribed to any number of times.
    pub fn of(values: impl IntoIterator<Item = T>) -> Self
    where
        T: Clone,
    {
        let values: Rc<Vec<T>> = Rc::new(values.into_iter().collect());
        Observable::new(move |observer| {
            for value in values.iter() {
                if observer.is_done() {
                    break;
                }
                observer.next(value.clone());
            }
            observer.complete();
            Subscription::empty()
        })
    }
}

impl Observable<u64> {
    /// Emit 0, 1, 2, … every `period`, the first value one full `period`
    /// after subscribing. Never completes; unsubscribing cancels the timer
    /// and is the only way the stream terminates.
    ///
    /// # Panics
    ///
    /// Panics at the call edge if `period` is zero (see
    /// [`Scheduler::schedule_periodic`]).
    pub fn interval(period: Duration, scheduler: &Scheduler) -> Self {
        assert!(!period.is_zero(), "interval period must be non-zero");
        let scheduler = scheduler.clone();
        Observable::new(move |observer| {
            let counter = Cell::new(0u64);
            let timer = scheduler.schedule_periodic(period, move || {
                let n = counter.get();
                counter.set(n + 1);
                observer.next(n);
            });
            let scheduler = scheduler.clone();
            Subscription::new(move || scheduler.cancel(timer))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn no_work_at_construction() {
        let ran = Rc::new(Cell::new(false));
        let ran_clone = Rc::clone(&ran);
        let observable = Observable::new(move |observer: ObserverRef<i32>| {
            ran_clone.set(true);
            observer.complete();
            Subscription::empty()
        });

        assert!(!ran.get());

        let completed = Rc::new(Cell::new(false));
        let completed_clone = Rc::clone(&completed);
        observable.subscribe_all(|_| {}, |_| {}, move || completed_clone.set(true));

        assert!(ran.get());
        assert!(completed.get());
    }

    #[test]
    fn of_delivers_in_order_then_completes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let completions = Rc::new(Cell::new(0u32));

        let seen_clone = Rc::clone(&seen);
        let completions_clone = Rc::clone(&completions);
        Observable::of([1, 2, 3]).subscribe_all(
            move |v| seen_clone.borrow_mut().push(v),
            |_| panic!("no error expected"),
            move || completions_clone.set(completions_clone.get() + 1),
        );

        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn of_empty_completes_without_values() {
        let seen = Rc::new(RefCell::new(Vec::<i32>::new()));
        let completed = Rc::new(Cell::new(false));

        let seen_clone = Rc::clone(&seen);
        let completed_clone = Rc::clone(&completed);
        Observable::of(Vec::<i32>::new()).subscribe_all(
            move |v| seen_clone.borrow_mut().push(v),
            |_| {},
            move || completed_clone.set(true),
        );

        assert!(seen.borrow().is_empty());
        assert!(completed.get());
    }

    #[test]
    fn of_is_cold_each_subscription_reruns() {
        let observable = Observable::of([1, 2]);
        for _ in 0..2 {
            let seen = Rc::new(RefCell::new(Vec::new()));
            let seen_clone = Rc::clone(&seen);
            observable.subscribe_next(move |v| seen_clone.borrow_mut().push(v));
            assert_eq!(*seen.borrow(), vec![1, 2]);
        }
    }

    #[test]
    fn empty_completes_immediately() {
        let completed = Rc::new(Cell::new(false));
        let completed_clone = Rc::clone(&completed);
        Observable::<i32>::empty().subscribe_all(
            |_| panic!("no values"),
            |_| {},
            move || completed_clone.set(true),
        );
        assert!(completed.get());
    }

    #[test]
    fn interval_emits_on_the_period() {
        let scheduler = Scheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);

        let _sub = Observable::interval(Duration::from_millis(50), &scheduler)
            .subscribe_next(move |v| seen_clone.borrow_mut().push(v));

        scheduler.advance(Duration::from_millis(25));
        assert!(seen.borrow().is_empty());

        scheduler.advance(Duration::from_millis(25));
        assert_eq!(*seen.borrow(), vec![0]);

        scheduler.advance(Duration::from_millis(150));
        assert_eq!(*seen.borrow(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn interval_unsubscribe_releases_the_timer() {
        let scheduler = Scheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);

        let sub = Observable::interval(Duration::from_millis(10), &scheduler)
            .subscribe_next(move |v| seen_clone.borrow_mut().push(v));

        scheduler.advance(Duration::from_millis(30));
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
        assert_eq!(scheduler.active_timers(), 1);

        sub.unsubscribe();
        assert_eq!(scheduler.active_timers(), 0);

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn interval_subscriptions_are_independent() {
        let scheduler = Scheduler::new();
        let observable = Observable::interval(Duration::from_millis(10), &scheduler);

        let first = Rc::new(RefCell::new(Vec::new()));
        let first_clone = Rc::clone(&first);
        let _a = observable.subscribe_next(move |v| first_clone.borrow_mut().push(v));

        scheduler.advance(Duration::from_millis(20));

        let second = Rc::new(RefCell::new(Vec::new()));
        let second_clone = Rc::clone(&second);
        let _b = observable.subscribe_next(move |v| second_clone.borrow_mut().push(v));

        scheduler.advance(Duration::from_millis(20));

        // The late subscriber restarts its own counter from 0.
        assert_eq!(*first.borrow(), vec![0, 1, 2, 3]);
        assert_eq!(*second.borrow(), vec![0, 1]);
    }
}
