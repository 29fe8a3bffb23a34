#![forbid(unsafe_code)]

//! Connection-state model.
//!
//! States are informational values observed through
//! [`EmitterService::connection_states`](crate::EmitterService::connection_states),
//! never thrown. Failure categories (timeout, authorization) are modeled as
//! a `Disconnected` state carrying the reason.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Link-status category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStateKind {
    Connecting,
    Connected,
    Disconnected,
}

/// Why a connection ended, where the client reported a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionError {
    #[error("Connection timeout")]
    Timeout,
    #[error("Authorization failed")]
    AuthFailed,
}

/// The adapter's belief about link status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionState {
    pub kind: ConnectionStateKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ConnectionError>,
}

impl ConnectionState {
    #[must_use]
    pub fn connecting() -> Self {
        Self {
            kind: ConnectionStateKind::Connecting,
            error: None,
        }
    }

    #[must_use]
    pub fn connected() -> Self {
        Self {
            kind: ConnectionStateKind::Connected,
            error: None,
        }
    }

    /// A clean disconnect, confirmed by the client without a failure reason.
    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            kind: ConnectionStateKind::Disconnected,
            error: None,
        }
    }

    /// A disconnect caused by `reason`.
    #[must_use]
    pub fn failed(reason: ConnectionError) -> Self {
        Self {
            kind: ConnectionStateKind::Disconnected,
            error: Some(reason),
        }
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether two states belong to the same notification category: same
    /// kind and same presence (not identity) of a failure reason. Used to
    /// collapse repeated notifications of the same category.
    #[must_use]
    pub fn same_category(&self, other: &Self) -> bool {
        self.kind == other.kind && self.has_error() == other.has_error()
    }
}
