#![forbid(unsafe_code)]

//! The adapter service.
//!
//! Wraps an [`EmitterClient`] and a local identity, and exposes the client's
//! callback surface as observables plus thin command methods. Both public
//! streams are composed fresh on every call: nothing is cached, and each
//! subscription owns its own handler registrations.
//!
//! # State machine
//!
//! Idle → `connect()` → Connecting → session started → Connected →
//! disconnected / timeout / auth failure → Disconnected → `connect()` → … .
//! Only client notifications reach the Disconnected state; a local
//! `disconnect()` call emits nothing until the client confirms.

use std::rc::Rc;

use rill_core::{Observable, Subject};
use serde_json::Value;

use crate::bridge::notifications;
use crate::client::{EmitterClient, EmitterEvent};
use crate::event::{IncomingEvent, RawEvent, ServiceConfig};
use crate::state::{ConnectionError, ConnectionState};

/// Stream-based facade over a callback-style protocol client.
pub struct EmitterService {
    client: Rc<dyn EmitterClient>,
    config: ServiceConfig,
    /// Local Connecting signal; the one piece of shared state. Single
    /// producer (`connect`), one consumer per `connection_states`
    /// subscription.
    connecting: Subject<()>,
}

impl EmitterService {
    pub fn new(client: Rc<dyn EmitterClient>, config: ServiceConfig) -> Self {
        Self {
            client,
            config,
            connecting: Subject::new(),
        }
    }

    /// Announce Connecting to current state subscribers, then command the
    /// client to connect. Connected arrives later via `session:started`.
    pub fn connect(&self) {
        tracing::debug!(message = "emitter.connect", own_id = self.config.own_id);
        self.connecting.next(());
        self.client.connect();
    }

    /// Command the client to disconnect. The resulting Disconnected state
    /// arrives asynchronously from the client's own confirmation.
    pub fn disconnect(&self) {
        tracing::debug!(message = "emitter.disconnect");
        self.client.disconnect();
    }

    /// Forward `event` to the client verbatim. The client will echo it back
    /// with our identity as sender; the echo never surfaces on [`events`].
    ///
    /// [`events`]: EmitterService::events
    pub fn publish_event(&self, event: IncomingEvent) {
        tracing::debug!(message = "emitter.publish", name = %event.name);
        self.client.publish_event(event);
    }

    /// Inbound messages from other senders, normalized to
    /// [`IncomingEvent`]. Malformed payloads are dropped with a warning;
    /// self-echoes (sender id equal to our own) are filtered out.
    pub fn events(&self) -> Observable<IncomingEvent> {
        let own_id = self.config.own_id;
        notifications(&self.client, EmitterEvent::IncomingEvent)
            .filter_map(|value| match serde_json::from_value::<RawEvent>(value) {
                Ok(raw) => Some(raw),
                Err(error) => {
                    tracing::warn!(message = "emitter.bad_event", %error);
                    None
                }
            })
            .filter(move |raw| raw.sender_id != own_id)
            .map(|raw| IncomingEvent {
                name: raw.name,
                payload: raw.data,
            })
    }

    /// The adapter's link-status stream: a merge of the local Connecting
    /// signal and the client's lifecycle notifications, with consecutive
    /// same-category states collapsed to the first of the run (repeated
    /// failures of the same category are not re-notified).
    pub fn connection_states(&self) -> Observable<ConnectionState> {
        let connecting = self
            .connecting
            .as_observable()
            .map(|()| ConnectionState::connecting());
        let connected = notifications(&self.client, EmitterEvent::SessionStarted)
            .map(|_| ConnectionState::connected());
        let dropped = notifications(&self.client, EmitterEvent::Disconnected)
            .map(|_| ConnectionState::disconnected());
        let timed_out = notifications(&self.client, EmitterEvent::ConnectionTimeout)
            .map(|_| ConnectionState::failed(ConnectionError::Timeout));
        let refused = notifications(&self.client, EmitterEvent::AuthFailed)
            .map(|_| ConnectionState::failed(ConnectionError::AuthFailed));

        Observable::merge([connecting, connected, dropped, timed_out, refused])
            .distinct_until_changed_by(ConnectionState::same_category)
    }

    /// Raw `publish:error` notifications, for callers that want to observe
    /// rejected publishes.
    pub fn publish_errors(&self) -> Observable<Value> {
        notifications(&self.client, EmitterEvent::PublishError)
    }
}
