//! Classify attempt failures for logs and reports.

use crate::probe::AttemptError;

/// Coarse failure category of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No response within the per-attempt timeout.
    Timeout,
    /// Any other transport fault (DNS, refused, reset, TLS, malformed).
    Transport,
    /// Response received with an unexpected status code.
    Status(u32),
    /// Status matched, body did not.
    Body,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Transport => "transport",
            FailureKind::Status(_) => "status",
            FailureKind::Body => "body",
        }
    }
}

pub fn classify(e: &AttemptError) -> FailureKind {
    match e {
        AttemptError::Transport { timed_out: true, .. } => FailureKind::Timeout,
        AttemptError::Transport { .. } => FailureKind::Transport,
        AttemptError::StatusMismatch { actual, .. } => FailureKind::Status(*actual),
        AttemptError::BodyMismatch => FailureKind::Body,
    }
}
