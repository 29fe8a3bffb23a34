#![forbid(unsafe_code)]

//! Operator implementations.
//!
//! Each operator is an `impl` block on [`Observable`](crate::Observable)
//! that builds a new observable wrapping the source; the wrapped producer
//! subscribes to the source with an adapter observer. Multi-source operators
//! (merge/concat/switch) keep their per-subscription bookkeeping in an
//! `Rc<RefCell<..>>` shared between the adapter observers and the returned
//! subscription's teardown.

mod concat;
mod distinct;
mod filter;
mod map;
mod merge;
mod switch;
mod take;
