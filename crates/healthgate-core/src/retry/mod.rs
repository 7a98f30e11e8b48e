//! Retry controller.
//!
//! Sequences attempts over time: one initial delay, then an inter-attempt
//! delay before every attempt after the first, until an attempt succeeds or
//! the attempt budget runs out. Failure classification lives here too so
//! logs and reports can tell timeouts from refusals from bad content.

mod classify;
mod error;
mod policy;
mod result;
mod run;

pub use classify::{classify, FailureKind};
pub use error::CheckAborted;
pub use policy::PollPolicy;
pub use result::{saturating_millis, CheckResult};
pub use run::{run_check, run_check_abortable, run_check_with};
