#![forbid(unsafe_code)]

//! Callback-to-observable bridge.
//!
//! This is the single point where the client's register/unregister API
//! meets the stream world: subscribing registers a handler, teardown
//! unregisters it. Every adapter stream is built on top of this function,
//! so no other module touches `on`/`off` directly.

use std::rc::Rc;

use rill_core::{Observable, Subscription};
use serde_json::Value;

use crate::client::{EmitterClient, EmitterEvent};

/// A lazy, unbounded stream of the client's `event` notifications. Each
/// subscription registers its own handler and unregisters it on teardown;
/// the stream never completes on its own.
pub fn notifications(client: &Rc<dyn EmitterClient>, event: EmitterEvent) -> Observable<Value> {
    let client = Rc::clone(client);
    Observable::new(move |observer| {
        let id = client.on(event, Rc::new(move |value| observer.next(value)));
        let client = Rc::clone(&client);
        Subscription::new(move || client.off(event, id))
    })
}
