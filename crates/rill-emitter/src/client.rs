#![forbid(unsafe_code)]

//! The client capability the adapter consumes.
//!
//! The actual protocol client (XMPP, a message bus, whatever) lives outside
//! this crate; the adapter only needs the callback surface modeled here.

use std::rc::Rc;

use serde_json::Value;

use crate::event::IncomingEvent;

/// Named notifications the client emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmitterEvent {
    /// Transport-level connection established (login still pending).
    Connected,
    /// Teardown confirmed by the client.
    Disconnected,
    /// Login succeeded; the link is usable.
    SessionStarted,
    /// An inbound [`RawEvent`](crate::RawEvent) payload.
    IncomingEvent,
    /// A local publish was rejected.
    PublishError,
    AuthFailed,
    ConnectionTimeout,
}

impl EmitterEvent {
    /// Wire name of the notification.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EmitterEvent::Connected => "connected",
            EmitterEvent::Disconnected => "disconnected",
            EmitterEvent::SessionStarted => "session:started",
            EmitterEvent::IncomingEvent => "incoming:event",
            EmitterEvent::PublishError => "publish:error",
            EmitterEvent::AuthFailed => "auth:failed",
            EmitterEvent::ConnectionTimeout => "connection:timeout",
        }
    }
}

/// Callback registered for a named notification. Notifications without a
/// payload deliver [`Value::Null`].
pub type EventHandler = Rc<dyn Fn(Value)>;

/// Identifies one handler registration, so it can be removed again.
/// (Closures are not comparable, so deregistration is by id rather than by
/// the callback itself.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u64);

/// Callback-style protocol client, as the underlying library presents it.
///
/// `connect` is asynchronously followed by a `session:started` notification
/// once login succeeds; `disconnect` by a `disconnected` notification.
/// Published events are echoed back as inbound events carrying the local
/// identity as sender.
pub trait EmitterClient {
    fn on(&self, event: EmitterEvent, handler: EventHandler) -> HandlerId;
    fn off(&self, event: EmitterEvent, handler: HandlerId);
    fn connect(&self);
    fn disconnect(&self);
    fn publish_event(&self, event: IncomingEvent);
}
