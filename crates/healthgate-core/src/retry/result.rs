use std::time::Duration;

use super::classify::FailureKind;

/// Final verdict of a check, handed to the reporting layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub succeeded: bool,
    /// Attempts actually executed, `1..=max_attempts`.
    pub attempts_made: u32,
    /// `"OK"` on success, otherwise the detail of the final failed attempt.
    pub last_detail: String,
    /// Category of the final failure; `None` on success.
    pub last_failure: Option<FailureKind>,
    /// Wall-clock time from the start of the initial delay to the verdict.
    pub elapsed: Duration,
}

/// Whole milliseconds in `d`, clamped to `u64::MAX`.
pub fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl CheckResult {
    /// Attempts that did not succeed.
    pub fn failed_attempts(&self) -> u32 {
        if self.succeeded {
            self.attempts_made.saturating_sub(1)
        } else {
            self.attempts_made
        }
    }
}
