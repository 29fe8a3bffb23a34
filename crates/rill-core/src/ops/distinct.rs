#![forbid(unsafe_code)]

//! Run suppression: `distinct_until_changed`.
//!
//! The last-delivered value is carried per subscription inside the adapter
//! observer, never shared between runs of the same observable.

use std::rc::Rc;

use crate::error::StreamError;
use crate::observable::Observable;
use crate::observer::{Observer, ObserverRef};

impl<T: Clone + 'static> Observable<T> {
    /// Suppress a value when it equals the previously delivered one.
    pub fn distinct_until_changed(&self) -> Observable<T>
    where
        T: PartialEq,
    {
        self.distinct_until_changed_by(|previous, candidate| previous == candidate)
    }

    /// Suppress a value when `same(previous, candidate)` holds. Only the
    /// first value of a run of "same" values is delivered.
    pub fn distinct_until_changed_by(
        &self,
        same: impl Fn(&T, &T) -> bool + 'static,
    ) -> Observable<T> {
        let source = self.clone();
        let same: Rc<dyn Fn(&T, &T) -> bool> = Rc::new(same);
        Observable::new(move |observer| {
            source.subscribe(DistinctObserver {
                downstream: observer,
                same: Rc::clone(&same),
                last: None,
            })
        })
    }
}

struct DistinctObserver<T> {
    downstream: ObserverRef<T>,
    same: Rc<dyn Fn(&T, &T) -> bool>,
    last: Option<T>,
}

impl<T: Clone + 'static> Observer<T> for DistinctObserver<T> {
    fn next(&mut self, value: T) {
        let repeat = self
            .last
            .as_ref()
            .is_some_and(|previous| (self.same)(previous, &value));
        if repeat {
            return;
        }
        self.last = Some(value.clone());
        self.downstream.next(value);
    }

    fn error(&mut self, reason: StreamError) {
        self.downstream.error(reason);
    }

    fn complete(&mut self) {
        self.downstream.complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn collapses_runs_to_their_first_value() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        Observable::of([1, 1, 2, 2, 2, 1, 3, 3])
            .distinct_until_changed()
            .subscribe_next(move |v| seen_clone.borrow_mut().push(v));
        assert_eq!(*seen.borrow(), vec![1, 2, 1, 3]);
    }

    #[test]
    fn custom_comparator_decides_sameness() {
        // Group by parity: consecutive values of equal parity collapse.
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        Observable::of([1, 3, 5, 2, 4, 7])
            .distinct_until_changed_by(|a, b| a % 2 == b % 2)
            .subscribe_next(move |v| seen_clone.borrow_mut().push(v));
        assert_eq!(*seen.borrow(), vec![1, 2, 7]);
    }

    #[test]
    fn comparison_state_is_per_subscription() {
        let observable = Observable::of([5, 5, 6]).distinct_until_changed();
        for _ in 0..2 {
            let seen = Rc::new(RefCell::new(Vec::new()));
            let seen_clone = Rc::clone(&seen);
            observable.subscribe_next(move |v| seen_clone.borrow_mut().push(v));
            assert_eq!(*seen.borrow(), vec![5, 6]);
        }
    }
}
