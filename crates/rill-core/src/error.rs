#![forbid(unsafe_code)]

//! Stream-level error type.

use thiserror::Error;

/// Failure reason delivered through [`Observer::error`](crate::Observer::error).
///
/// Carries only the human-readable reason, not the failing value or a source
/// chain: stream errors terminate a single subscription and are reported, not
/// recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StreamError {
    message: String,
}

impl StreamError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_message_only() {
        let err = StreamError::new("boom");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn equality_is_by_message() {
        assert_eq!(StreamError::new("a"), StreamError::new("a"));
        assert_ne!(StreamError::new("a"), StreamError::new("b"));
    }
}
