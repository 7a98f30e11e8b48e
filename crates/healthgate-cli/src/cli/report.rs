//! Turn a check outcome into an exit code and a printed report.
//!
//! The JSON shape follows what automation hosts expect from a module run:
//! `changed: false` on success, `failed: true` plus `msg` on failure, and
//! `failed_attempts` in both cases.

use anyhow::Result;
use healthgate_core::retry::saturating_millis;
use healthgate_core::{CheckAborted, CheckResult};
use serde::Serialize;
use std::process::ExitCode;

/// All attempts failed.
pub const EXIT_GAVE_UP: u8 = 1;
/// The check could not run (bad flags, bad config file).
pub const EXIT_ERROR: u8 = 2;
/// Interrupted before reaching a verdict (128 + SIGINT).
pub const EXIT_ABORTED: u8 = 130;

pub type Outcome = Result<CheckResult, CheckAborted>;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    pub failed_attempts: u32,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<&'static str>,
    pub elapsed_ms: u64,
}

impl Report {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Ok(r) if r.succeeded => Report {
                changed: Some(false),
                failed: None,
                msg: None,
                failed_attempts: r.failed_attempts(),
                attempts: r.attempts_made,
                failure_kind: None,
                elapsed_ms: saturating_millis(r.elapsed),
            },
            Ok(r) => Report {
                changed: None,
                failed: Some(true),
                msg: Some(format!("Maximum attempts reached: {}", r.last_detail)),
                failed_attempts: r.failed_attempts(),
                attempts: r.attempts_made,
                failure_kind: r.last_failure.map(|k| k.as_str()),
                elapsed_ms: saturating_millis(r.elapsed),
            },
            Err(aborted) => Report {
                changed: None,
                failed: Some(true),
                msg: Some(aborted.to_string()),
                failed_attempts: aborted.attempts_made,
                attempts: aborted.attempts_made,
                failure_kind: None,
                elapsed_ms: saturating_millis(aborted.elapsed),
            },
        }
    }
}

pub fn exit_code(outcome: &Outcome) -> u8 {
    match outcome {
        Ok(r) if r.succeeded => 0,
        Ok(_) => EXIT_GAVE_UP,
        Err(_) => EXIT_ABORTED,
    }
}

pub fn human_line(outcome: &Outcome, target: &str) -> String {
    match outcome {
        Ok(r) if r.succeeded => format!(
            "healthy: {} after {} attempt(s) in {:.1}s",
            target,
            r.attempts_made,
            r.elapsed.as_secs_f64()
        ),
        Ok(r) => format!(
            "unhealthy: {} maximum attempts reached ({}): {}",
            target, r.attempts_made, r.last_detail
        ),
        Err(aborted) => match &aborted.last_detail {
            Some(detail) => format!("aborted: {} {} (last: {})", target, aborted, detail),
            None => format!("aborted: {} {}", target, aborted),
        },
    }
}

/// Print the report to stdout and return the process exit code.
pub fn emit(outcome: &Outcome, target: &str, json: bool) -> Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string(&Report::from_outcome(outcome))?);
    } else {
        println!("{}", human_line(outcome, target));
    }
    Ok(ExitCode::from(exit_code(outcome)))
}
