#![forbid(unsafe_code)]

//! Cold, push-based observable streams for single-threaded reactive code.
//!
//! This crate provides the stream primitive and its operator set:
//!
//! - [`Observable`]: a lazy description of a producer process. Nothing runs
//!   until [`subscribe`](Observable::subscribe) is called, and every
//!   subscription is an independent run (cold semantics — no replay, no
//!   sharing between subscribers).
//! - [`Observer`]: the capability set a subscriber presents
//!   (`next`/`error`/`complete`).
//! - [`Subscription`]: a handle over one active run, with idempotent,
//!   synchronous teardown.
//! - [`Subject`]: a hot multicast signal for bridging imperative call sites
//!   into the stream world.
//! - [`Scheduler`]: a virtual-time timer driver for time-based sources
//!   ([`Observable::interval`]) and deterministic tests.
//!
//! # Architecture
//!
//! Everything is `Rc`/`RefCell`-based and single-threaded by design; delivery
//! is synchronous with respect to the event or tick that drives it. "Waiting"
//! is a not-yet-invoked callback, never a blocked thread.
//!
//! # Invariants
//!
//! 1. Constructing an observable performs no work; the producer runs only
//!    inside `subscribe`.
//! 2. After `complete()` or `error()` has been delivered through a
//!    subscription, no further signal reaches that observer.
//! 3. `unsubscribe()` is idempotent and releases every resource the operator
//!    chain acquired (timers, listener registrations, upstream subscriptions)
//!    before it returns.
//! 4. Values reach a subscriber in the order their producer emitted them.

pub mod error;
pub mod observable;
pub mod observer;
mod ops;
pub mod scheduler;
pub mod subject;
pub mod subscription;

pub use error::StreamError;
pub use observable::Observable;
pub use observer::{FnObserver, Observer, ObserverRef};
pub use scheduler::{Scheduler, TimerId};
pub use subject::Subject;
pub use subscription::Subscription;
