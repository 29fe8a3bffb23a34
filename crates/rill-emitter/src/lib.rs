#![forbid(unsafe_code)]

//! Stream adapter over a callback-style emitter client.
//!
//! Protocol client libraries typically expose a stateful, callback-based
//! surface: register a handler by event name, get JSON payloads pushed at
//! you, drive the connection with `connect`/`disconnect`. This crate wraps
//! such a client (anything implementing [`EmitterClient`]) and re-exposes
//! it as two continuous [`Observable`](rill_core::Observable) streams:
//!
//! - [`EmitterService::connection_states`]: the adapter's belief about link
//!   status (Connecting / Connected / Disconnected, with a failure reason
//!   where one exists), with consecutive same-category states collapsed.
//! - [`EmitterService::events`]: inbound messages from *other* senders,
//!   normalized to [`IncomingEvent`] — the client's echoes of our own
//!   publishes are filtered out by sender identity.
//!
//! All callback interop lives in one place, [`bridge::notifications`];
//! everything else is operator composition on top of it.

pub mod bridge;
pub mod client;
pub mod event;
pub mod service;
pub mod state;

pub use bridge::notifications;
pub use client::{EmitterClient, EmitterEvent, EventHandler, HandlerId};
pub use event::{IncomingEvent, RawEvent, ServiceConfig};
pub use service::EmitterService;
pub use state::{ConnectionError, ConnectionState, ConnectionStateKind};
