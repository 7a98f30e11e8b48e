//! Attempt evaluation: one request, one verdict.
//!
//! Uses the curl crate (libcurl) for the exchange and `verdict::judge` for
//! the success predicate. Nothing here retries; the loop lives in `retry`.

mod error;
mod request;
mod verdict;

pub use error::AttemptError;
pub use verdict::judge;

use crate::check::CheckConfig;
use crate::control::AbortToken;

/// Detail string reported for a healthy attempt.
pub const OK_DETAIL: &str = "OK";

/// Result of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Healthy,
    Unhealthy(AttemptError),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Healthy)
    }

    /// `"OK"` on success, otherwise a description of the failure.
    pub fn detail(&self) -> String {
        match self {
            AttemptOutcome::Healthy => OK_DETAIL.to_string(),
            AttemptOutcome::Unhealthy(e) => e.to_string(),
        }
    }
}

impl From<Result<(), AttemptError>> for AttemptOutcome {
    fn from(r: Result<(), AttemptError>) -> Self {
        match r {
            Ok(()) => AttemptOutcome::Healthy,
            Err(e) => AttemptOutcome::Unhealthy(e),
        }
    }
}

/// Something that can run one attempt against a configuration.
///
/// Implemented for closures so tests can drive the retry loop with
/// scripted outcomes.
pub trait Evaluate {
    fn evaluate(&mut self, config: &CheckConfig) -> AttemptOutcome;
}

impl<F> Evaluate for F
where
    F: FnMut(&CheckConfig) -> AttemptOutcome,
{
    fn evaluate(&mut self, config: &CheckConfig) -> AttemptOutcome {
        self(config)
    }
}

/// Production evaluator backed by libcurl.
#[derive(Debug, Clone, Default)]
pub struct CurlEvaluator {
    abort: Option<AbortToken>,
}

impl CurlEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluator whose in-flight transfers stop as soon as `token` is tripped.
    pub fn with_abort(token: AbortToken) -> Self {
        Self { abort: Some(token) }
    }
}

impl Evaluate for CurlEvaluator {
    fn evaluate(&mut self, config: &CheckConfig) -> AttemptOutcome {
        evaluate(config, self.abort.as_ref())
    }
}

/// Run one attempt: send the request, then judge the response.
///
/// The body is only buffered when a pattern is configured; otherwise it is
/// drained and discarded.
pub fn evaluate(config: &CheckConfig, abort: Option<&AbortToken>) -> AttemptOutcome {
    let pattern = config.expected_body_pattern();
    match request::perform(config, pattern.is_some(), abort) {
        Ok(resp) => {
            tracing::trace!(
                status = resp.status,
                body_len = resp.body.len(),
                "received response"
            );
            judge(resp.status, &resp.body, config.expected_status(), pattern).into()
        }
        Err(e) => AttemptOutcome::Unhealthy(AttemptError::from_curl(&e)),
    }
}
