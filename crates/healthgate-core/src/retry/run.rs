//! Retry loop: evaluate until healthy or the budget is spent.

use std::time::Instant;

use crate::check::CheckConfig;
use crate::control::AbortToken;
use crate::probe::{AttemptError, AttemptOutcome, CurlEvaluator, Evaluate, OK_DETAIL};

use super::classify::classify;
use super::error::CheckAborted;
use super::policy::PollPolicy;
use super::result::{saturating_millis, CheckResult};

/// Run a full check against the network with the libcurl evaluator.
/// Blocks for up to `config.worst_case_duration()`.
pub fn run_check(config: &CheckConfig) -> CheckResult {
    run_check_with(config, &mut CurlEvaluator::new())
}

/// Run a full check with a caller-supplied evaluator. Cannot be aborted.
pub fn run_check_with<E>(config: &CheckConfig, evaluator: &mut E) -> CheckResult
where
    E: Evaluate + ?Sized,
{
    let never = AbortToken::new();
    match run_check_abortable(config, evaluator, &never) {
        Ok(result) => result,
        Err(aborted) => aborted.into_result(),
    }
}

/// Run a full check that stops early once `abort` is tripped.
///
/// Attempts run strictly one after another on the calling thread. The abort
/// is noticed during delays and after each attempt; pass the same token to
/// `CurlEvaluator::with_abort` to also cut off the in-flight request.
pub fn run_check_abortable<E>(
    config: &CheckConfig,
    evaluator: &mut E,
    abort: &AbortToken,
) -> Result<CheckResult, CheckAborted>
where
    E: Evaluate + ?Sized,
{
    let policy = PollPolicy::from_config(config);
    let started = Instant::now();
    let mut last_error: Option<AttemptError> = None;
    let mut attempts_made = 0u32;

    let aborted = |attempts_made: u32, last: &Option<AttemptError>| CheckAborted {
        attempts_made,
        last_detail: last.as_ref().map(|e| e.to_string()),
        elapsed: started.elapsed(),
    };

    tracing::debug!(
        target_url = %config.target(),
        max_attempts = policy.max_attempts,
        worst_case_ms = saturating_millis(config.worst_case_duration()),
        "starting health check"
    );

    let mut attempt = 1u32;
    while let Some(delay) = policy.delay_before(attempt) {
        if abort.sleep(delay).is_err() {
            tracing::warn!(attempts_made, "health check aborted while waiting");
            return Err(aborted(attempts_made, &last_error));
        }

        let attempt_started = Instant::now();
        let outcome = evaluator.evaluate(config);
        attempts_made = attempt;
        let attempt_ms = saturating_millis(attempt_started.elapsed());

        match outcome {
            AttemptOutcome::Healthy => {
                tracing::info!(attempt, attempt_ms, "{} is healthy", config.target());
                return Ok(CheckResult {
                    succeeded: true,
                    attempts_made: attempt,
                    last_detail: OK_DETAIL.to_string(),
                    last_failure: None,
                    elapsed: started.elapsed(),
                });
            }
            AttemptOutcome::Unhealthy(err) => {
                if abort.is_aborted() {
                    tracing::warn!(attempt, "health check aborted during attempt");
                    return Err(aborted(attempts_made, &last_error));
                }
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    kind = classify(&err).as_str(),
                    attempt_ms,
                    "attempt failed: {}",
                    err
                );
                last_error = Some(err);
            }
        }
        attempt += 1;
    }

    let last_failure = last_error.as_ref().map(classify);
    let last_detail = last_error.map(|e| e.to_string()).unwrap_or_default();
    tracing::warn!(
        attempts_made,
        "maximum attempts reached: {}",
        last_detail
    );
    Ok(CheckResult {
        succeeded: false,
        attempts_made,
        last_detail,
        last_failure,
        elapsed: started.elapsed(),
    })
}
