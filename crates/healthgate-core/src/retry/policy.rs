use std::time::Duration;

use crate::check::CheckConfig;

/// Delay schedule and attempt budget of a check.
///
/// Delays are applied *before* attempts, never after failures, so attempt 1
/// waits `initial_delay` and every later attempt waits `inter_attempt_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Wait before the first attempt; applied even when `max_attempts == 1`.
    pub initial_delay: Duration,
    /// Wait before each attempt after the first.
    pub inter_attempt_delay: Duration,
}

impl PollPolicy {
    pub fn from_config(config: &CheckConfig) -> Self {
        Self {
            max_attempts: config.max_attempts(),
            initial_delay: config.initial_delay(),
            inter_attempt_delay: config.inter_attempt_delay(),
        }
    }

    /// Delay to wait before `attempt` (1-based). Returns `None` when the
    /// attempt is outside the budget, which is how the loop terminates.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        match attempt {
            0 => None,
            n if n > self.max_attempts => None,
            1 => Some(self.initial_delay),
            _ => Some(self.inter_attempt_delay),
        }
    }

    /// Total sleeping time if every attempt is made.
    pub fn total_delay(&self) -> Duration {
        self.initial_delay.saturating_add(
            self.inter_attempt_delay
                .saturating_mul(self.max_attempts.saturating_sub(1)),
        )
    }
}
