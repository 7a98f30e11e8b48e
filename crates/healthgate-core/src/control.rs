//! Cancellation for a running check: a shared abort token and an
//! interruptible sleep.
//!
//! The retry loop sleeps through the token so an external abort (Ctrl-C, an
//! outer deadline in the host tool) does not have to wait out a full delay.
//! The curl evaluator polls the same token from its progress callback to
//! cut an in-flight transfer short.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Granularity at which a sleeping check notices an abort request.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Returned by `AbortToken::sleep` when the wait was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

impl std::fmt::Display for Interrupted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sleep interrupted by abort request")
    }
}

impl std::error::Error for Interrupted {}

/// Cheaply clonable flag; all clones observe the same abort request.
#[derive(Debug, Clone, Default)]
pub struct AbortToken {
    flag: Arc<AtomicBool>,
}

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request abort. Idempotent.
    pub fn abort(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Sleep for `duration` unless abort is requested first. Checks the flag
    /// before sleeping, so a zero-length sleep still observes an abort.
    /// A duration past the end of the clock never completes; only an abort
    /// ends it.
    pub fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let deadline = Instant::now().checked_add(duration);
        loop {
            if self.is_aborted() {
                return Err(Interrupted);
            }
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(());
                    }
                    (deadline - now).min(SLEEP_SLICE)
                }
                None => SLEEP_SLICE,
            };
            std::thread::sleep(slice);
        }
    }
}
