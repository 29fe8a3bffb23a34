#![forbid(unsafe_code)]

//! Prefix truncation: `take`.

use crate::error::StreamError;
use crate::observable::Observable;
use crate::observer::{Observer, ObserverRef};
use crate::subscription::Subscription;

impl<T: 'static> Observable<T> {
    /// Forward the first `count` values, then synchronously unsubscribe the
    /// source and complete. `take(0)` completes at subscribe time without
    /// ever subscribing the source. An earlier natural `complete` from the
    /// source propagates as-is.
    pub fn take(&self, count: usize) -> Observable<T> {
        let source = self.clone();
        Observable::new(move |observer| {
            if count == 0 {
                observer.complete();
                return Subscription::empty();
            }
            let upstream = Subscription::empty();
            let inner = source.subscribe(TakeObserver {
                downstream: observer,
                remaining: count,
                upstream: upstream.clone(),
            });
            // For a source that completed synchronously the slot is already
            // closed and attach tears `inner` down on the spot.
            upstream.attach(inner);
            upstream
        })
    }
}

struct TakeObserver<T> {
    downstream: ObserverRef<T>,
    remaining: usize,
    upstream: Subscription,
}

impl<T: 'static> Observer<T> for TakeObserver<T> {
    fn next(&mut self, value: T) {
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;
        self.downstream.next(value);
        if self.remaining == 0 {
            self.upstream.unsubscribe();
            self.downstream.complete();
        }
    }

    fn error(&mut self, reason: StreamError) {
        self.downstream.error(reason);
    }

    fn complete(&mut self) {
        self.downstream.complete();
    }
}
