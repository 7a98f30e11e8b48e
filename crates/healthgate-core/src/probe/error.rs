//! Why a single attempt did not count as healthy.

use thiserror::Error;

/// Failure of one attempt. Every variant is recoverable: the retry loop
/// records it and moves on to the next attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// No response was obtained (DNS, connect, TLS, reset, timeout, garbage).
    #[error("{message}")]
    Transport { message: String, timed_out: bool },

    /// A response arrived with the wrong status code.
    #[error("expected status {expected}, actual: {actual}")]
    StatusMismatch { expected: u32, actual: u32 },

    /// Status matched but the body did not match the pattern at offset 0.
    #[error("content did not match expected pattern")]
    BodyMismatch,
}

impl AttemptError {
    /// Transport failure with a free-form description.
    pub fn transport(message: impl Into<String>) -> Self {
        AttemptError::Transport {
            message: message.into(),
            timed_out: false,
        }
    }

    pub(crate) fn from_curl(e: &curl::Error) -> Self {
        AttemptError::Transport {
            message: e.to_string(),
            timed_out: e.is_operation_timedout(),
        }
    }
}
