//! healthgate: block until an HTTP endpoint reports healthy.
//!
//! `check` holds the validated configuration, `probe` runs a single attempt,
//! and `retry` sequences attempts into a final `CheckResult`.

pub mod check;
pub mod config;
pub mod control;
pub mod logging;
pub mod probe;
pub mod retry;

pub use check::{CheckConfig, ConfigError};
pub use control::AbortToken;
pub use probe::{AttemptError, AttemptOutcome, CurlEvaluator, Evaluate};
pub use retry::{run_check, run_check_abortable, run_check_with, CheckAborted, CheckResult};
