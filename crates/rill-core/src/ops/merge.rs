#![forbid(unsafe_code)]

//! Concurrent flattening: `merge_all` and the static `merge` combinator.
//!
//! Every inner observable is subscribed the moment the outer emits it;
//! values interleave strictly in emission order. The merged stream completes
//! only once the outer has completed and no inner is still live.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::StreamError;
use crate::observable::Observable;
use crate::observer::{Observer, ObserverRef};
use crate::subscription::Subscription;

impl<T: 'static> Observable<T> {
    /// Merge a fixed set of sources into one stream.
    pub fn merge(sources: impl IntoIterator<Item = Observable<T>>) -> Observable<T> {
        Observable::of(sources.into_iter().collect::<Vec<_>>()).merge_all()
    }
}

impl<T: 'static> Observable<Observable<T>> {
    /// Flatten a higher-order observable by running all inner observables
    /// concurrently. Unsubscribing tears down the outer subscription and
    /// every live inner subscription.
    pub fn merge_all(&self) -> Observable<T> {
        let outer = self.clone();
        Observable::new(move |observer| {
            let state = Rc::new(RefCell::new(MergeState {
                outer_done: false,
                live: 0,
            }));
            let composite = Subscription::empty();
            let outer_sub = outer.subscribe(MergeOuter {
                state,
                downstream: observer,
                composite: composite.clone(),
            });
            composite.attach(outer_sub);
            composite
        })
    }
}

struct MergeState {
    outer_done: bool,
    live: usize,
}

struct MergeOuter<T> {
    state: Rc<RefCell<MergeState>>,
    downstream: ObserverRef<T>,
    composite: Subscription,
}

impl<T: 'static> Observer<Observable<T>> for MergeOuter<T> {
    fn next(&mut self, inner: Observable<T>) {
        self.state.borrow_mut().live += 1;
        let sub = inner.subscribe(MergeInner {
            state: Rc::clone(&self.state),
            downstream: self.downstream.clone(),
            composite: self.composite.clone(),
        });
        self.composite.attach(sub);
    }

    fn error(&mut self, reason: StreamError) {
        self.composite.unsubscribe();
        self.downstream.error(reason);
    }

    fn complete(&mut self) {
        let all_done = {
            let mut state = self.state.borrow_mut();
            state.outer_done = true;
            state.live == 0
        };
        if all_done {
            self.downstream.complete();
        }
    }
}

struct MergeInner<T> {
    state: Rc<RefCell<MergeState>>,
    downstream: ObserverRef<T>,
    composite: Subscription,
}

impl<T: 'static> Observer<T> for MergeInner<T> {
    fn next(&mut self, value: T) {
        self.downstream.next(value);
    }

    fn error(&mut self, reason: StreamError) {
        self.composite.unsubscribe();
        self.downstream.error(reason);
    }

    fn complete(&mut self) {
        let all_done = {
            let mut state = self.state.borrow_mut();
            state.live -= 1;
            state.outer_done && state.live == 0
        };
        if all_done {
            self.downstream.complete();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    use crate::scheduler::Scheduler;

    fn staggered(
        scheduler: &Scheduler,
        period_ms: u64,
        offset: u64,
    ) -> Observable<u64> {
        Observable::interval(Duration::from_millis(period_ms), scheduler)
            .take(3)
            .map(move |v| offset + v)
    }

    #[test]
    fn interleaves_by_emission_order() {
        let scheduler = Scheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let completed = Rc::new(Cell::new(false));

        let sources = [
            staggered(&scheduler, 10, 10),
            staggered(&scheduler, 15, 20),
            staggered(&scheduler, 35, 30),
        ];

        let seen_clone = Rc::clone(&seen);
        let completed_clone = Rc::clone(&completed);
        let _sub = Observable::merge(sources).subscribe_all(
            move |v| seen_clone.borrow_mut().push(v),
            |_| {},
            move || completed_clone.set(true),
        );

        scheduler.advance(Duration::from_millis(200));

        // 10@10ms, 20@15, 11@20, {12, 21}@30 (first source wins the tie),
        // 30@35, 22@45, 31@70, 32@105.
        assert_eq!(*seen.borrow(), vec![10, 20, 11, 12, 21, 30, 22, 31, 32]);
        assert!(completed.get());
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn completes_only_after_every_inner_completes() {
        let scheduler = Scheduler::new();
        let completed = Rc::new(Cell::new(false));

        let fast = Observable::interval(Duration::from_millis(10), &scheduler).take(1);
        let slow = Observable::interval(Duration::from_millis(100), &scheduler).take(1);

        let completed_clone = Rc::clone(&completed);
        let _sub = Observable::merge([fast, slow]).subscribe_all(
            |_| {},
            |_| {},
            move || completed_clone.set(true),
        );

        scheduler.advance(Duration::from_millis(50));
        assert!(!completed.get());
        scheduler.advance(Duration::from_millis(50));
        assert!(completed.get());
    }

    #[test]
    fn synchronous_sources_merge_in_sequence() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let completed = Rc::new(Cell::new(false));

        let seen_clone = Rc::clone(&seen);
        let completed_clone = Rc::clone(&completed);
        Observable::merge([Observable::of([1, 2]), Observable::of([3, 4])]).subscribe_all(
            move |v| seen_clone.borrow_mut().push(v),
            |_| {},
            move || completed_clone.set(true),
        );

        assert_eq!(*seen.borrow(), vec![1, 2, 3, 4]);
        assert!(completed.get());
    }

    #[test]
    fn merge_of_no_sources_completes_immediately() {
        let completed = Rc::new(Cell::new(false));
        let completed_clone = Rc::clone(&completed);
        Observable::<i32>::merge([]).subscribe_all(
            |_| panic!("no values"),
            |_| {},
            move || completed_clone.set(true),
        );
        assert!(completed.get());
    }

    #[test]
    fn unsubscribe_tears_down_every_live_inner() {
        let scheduler = Scheduler::new();
        let sources = [
            Observable::interval(Duration::from_millis(10), &scheduler),
            Observable::interval(Duration::from_millis(20), &scheduler),
            Observable::interval(Duration::from_millis(30), &scheduler),
        ];

        let sub = Observable::merge(sources).subscribe_next(|_| {});
        scheduler.advance(Duration::from_millis(25));
        assert_eq!(scheduler.active_timers(), 3);

        sub.unsubscribe();
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn inner_error_terminates_the_merge() {
        let scheduler = Scheduler::new();
        let errors = Rc::new(RefCell::new(Vec::new()));

        let failing = Observable::interval(Duration::from_millis(10), &scheduler)
            .try_map(|v| {
                if v == 1 {
                    Err(StreamError::new("inner failed"))
                } else {
                    Ok(v)
                }
            });
        let steady = Observable::interval(Duration::from_millis(10), &scheduler).map(|v| v + 100);

        let errors_clone = Rc::clone(&errors);
        let _sub = Observable::merge([failing, steady]).subscribe_all(
            |_| {},
            move |e| errors_clone.borrow_mut().push(e),
            || panic!("errored streams do not complete"),
        );

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(*errors.borrow(), vec![StreamError::new("inner failed")]);
        // The sibling inner is torn down with the merge.
        assert_eq!(scheduler.active_timers(), 0);
    }
}
