//! Error returned when a check is cancelled from outside.

use std::time::Duration;
use thiserror::Error;

use super::result::CheckResult;

/// The check was aborted through its `AbortToken` before reaching a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("health check aborted after {attempts_made} attempt(s)")]
pub struct CheckAborted {
    /// Attempts completed (or cut off) before the abort was noticed.
    pub attempts_made: u32,
    /// Detail of the last completed failed attempt, if any.
    pub last_detail: Option<String>,
    pub elapsed: Duration,
}

impl CheckAborted {
    /// Degrade to a failed result, for callers that only want a verdict.
    pub fn into_result(self) -> CheckResult {
        CheckResult {
            succeeded: false,
            attempts_made: self.attempts_made,
            last_detail: self
                .last_detail
                .unwrap_or_else(|| "health check aborted".to_string()),
            last_failure: None,
            elapsed: self.elapsed,
        }
    }
}
