#![forbid(unsafe_code)]

//! Selection operators: `filter` and `filter_map`.

use std::rc::Rc;

use crate::error::StreamError;
use crate::observable::Observable;
use crate::observer::{Observer, ObserverRef};

impl<T: 'static> Observable<T> {
    /// Forward only the values `predicate` accepts.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Observable<T> {
        let source = self.clone();
        let predicate: Rc<dyn Fn(&T) -> bool> = Rc::new(predicate);
        Observable::new(move |observer| {
            source.subscribe(FilterObserver {
                downstream: observer,
                predicate: Rc::clone(&predicate),
            })
        })
    }

    /// Combined select-and-project step: values mapped to `None` are
    /// dropped, `Some(r)` is forwarded as `r`.
    pub fn filter_map<R: 'static>(&self, f: impl Fn(T) -> Option<R> + 'static) -> Observable<R> {
        let source = self.clone();
        let f: Rc<dyn Fn(T) -> Option<R>> = Rc::new(f);
        Observable::new(move |observer| {
            source.subscribe(FilterMapObserver {
                downstream: observer,
                f: Rc::clone(&f),
            })
        })
    }
}

struct FilterObserver<T> {
    downstream: ObserverRef<T>,
    predicate: Rc<dyn Fn(&T) -> bool>,
}

impl<T: 'static> Observer<T> for FilterObserver<T> {
    fn next(&mut self, value: T) {
        if (self.predicate)(&value) {
            self.downstream.next(value);
        }
    }

    fn error(&mut self, reason: StreamError) {
        self.downstream.error(reason);
    }

    fn complete(&mut self) {
        self.downstream.complete();
    }
}

struct FilterMapObserver<T, R> {
    downstream: ObserverRef<R>,
    f: Rc<dyn Fn(T) -> Option<R>>,
}

impl<T: 'static, R: 'static> Observer<T> for FilterMapObserver<T, R> {
    fn next(&mut self, value: T) {
        if let Some(projected) = (self.f)(value) {
            self.downstream.next(projected);
        }
    }

    fn error(&mut self, reason: StreamError) {
        self.downstream.error(reason);
    }

    fn complete(&mut self) {
        self.downstream.complete();
    }
}
