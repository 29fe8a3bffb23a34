#![forbid(unsafe_code)]

//! Inbound message shapes and the service identity.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire shape of an inbound event as the client delivers it.
///
/// Every event carries the sender's identity; the client echoes our own
/// publishes back with our id as `senderId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub name: String,
    pub sender_id: u64,
    pub data: Value,
}

/// A normalized inbound message: a [`RawEvent`] with the sender identity
/// dropped and `data` renamed to `payload`. Also the shape handed to
/// [`EmitterClient::publish_event`](crate::EmitterClient::publish_event).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingEvent {
    pub name: String,
    pub payload: Value,
}

/// Immutable service identity, supplied once at construction. `own_id` is
/// the key for self-echo filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub own_id: u64,
}
