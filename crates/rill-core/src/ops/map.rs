#![forbid(unsafe_code)]

//! Value projection: `map` and its fallible sibling `try_map`.

use std::rc::Rc;

use crate::error::StreamError;
use crate::observable::Observable;
use crate::observer::{Observer, ObserverRef};
use crate::subscription::Subscription;

impl<T: 'static> Observable<T> {
    /// Apply `projection` to every upstream value; `error` and `complete`
    /// pass through unchanged.
    pub fn map<R: 'static>(&self, projection: impl Fn(T) -> R + 'static) -> Observable<R> {
        let source = self.clone();
        let projection: Rc<dyn Fn(T) -> R> = Rc::new(projection);
        Observable::new(move |observer| {
            source.subscribe(MapObserver {
                downstream: observer,
                projection: Rc::clone(&projection),
            })
        })
    }

    /// Fallible projection. The first `Err` is delivered as `error` to the
    /// downstream observer, the upstream subscription is torn down, and no
    /// further upstream signal reaches this subscriber. Projection failure
    /// terminates immediately; remaining upstream values are not inspected.
    pub fn try_map<R: 'static>(
        &self,
        projection: impl Fn(T) -> Result<R, StreamError> + 'static,
    ) -> Observable<R> {
        let source = self.clone();
        let projection: Rc<dyn Fn(T) -> Result<R, StreamError>> = Rc::new(projection);
        Observable::new(move |observer| {
            let upstream = Subscription::empty();
            let inner = source.subscribe(TryMapObserver {
                downstream: observer,
                projection: Rc::clone(&projection),
                upstream: upstream.clone(),
                failed: false,
            });
            upstream.attach(inner);
            upstream
        })
    }
}

struct MapObserver<T, R> {
    downstream: ObserverRef<R>,
    projection: Rc<dyn Fn(T) -> R>,
}

impl<T: 'static, R: 'static> Observer<T> for MapObserver<T, R> {
    fn next(&mut self, value: T) {
        let projected = (self.projection)(value);
        self.downstream.next(projected);
    }

    fn error(&mut self, reason: StreamError) {
        self.downstream.error(reason);
    }

    fn complete(&mut self) {
        self.downstream.complete();
    }
}

struct TryMapObserver<T, R> {
    downstream: ObserverRef<R>,
    projection: Rc<dyn Fn(T) -> Result<R, StreamError>>,
    upstream: Subscription,
    failed: bool,
}

impl<T: 'static, R: 'static> Observer<T> for TryMapObserver<T, R> {
    fn next(&mut self, value: T) {
        if self.failed {
            return;
        }
        match (self.projection)(value) {
            Ok(projected) => self.downstream.next(projected),
            Err(reason) => {
                self.failed = true;
                self.upstream.unsubscribe();
                self.downstream.error(reason);
            }
        }
    }

    fn error(&mut self, reason: StreamError) {
        if !self.failed {
            self.downstream.error(reason);
        }
    }

    fn complete(&mut self) {
        if !self.failed {
            self.downstream.complete();
        }
    }
}
