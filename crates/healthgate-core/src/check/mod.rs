//! Validated parameters for one health-check invocation.
//!
//! `CheckConfig` is built once through `CheckConfigBuilder`, which performs
//! every validation up front; the retry loop and the evaluator only ever see
//! a well-formed configuration and never mutate it.

mod error;
mod headers;
mod pattern;

pub use error::ConfigError;
pub use headers::Headers;
pub use pattern::BodyPattern;

use std::time::Duration;
use url::Url;

use crate::retry::PollPolicy;

/// Request method used when none is configured.
pub const DEFAULT_METHOD: &str = "GET";

/// Largest per-attempt timeout libcurl accepts on every platform
/// (milliseconds in a 32-bit `long`).
pub const MAX_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(i32::MAX as u64);

/// Immutable, validated configuration for a health check.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    target: Url,
    method: String,
    headers: Headers,
    initial_delay: Duration,
    inter_attempt_delay: Duration,
    max_attempts: u32,
    per_attempt_timeout: Duration,
    expected_status: u32,
    expected_body_pattern: Option<BodyPattern>,
    follow_redirects: bool,
}

impl CheckConfig {
    /// Start building a configuration for `target`. Everything else starts
    /// from the same defaults as the config file (see `config::GateConfig`).
    pub fn builder(target: impl Into<String>) -> CheckConfigBuilder {
        CheckConfigBuilder::new(target)
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn inter_attempt_delay(&self) -> Duration {
        self.inter_attempt_delay
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn per_attempt_timeout(&self) -> Duration {
        self.per_attempt_timeout
    }

    pub fn expected_status(&self) -> u32 {
        self.expected_status
    }

    pub fn expected_body_pattern(&self) -> Option<&BodyPattern> {
        self.expected_body_pattern.as_ref()
    }

    pub fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }

    /// Upper bound on wall-clock time when every attempt times out:
    /// `initial + (n - 1) * between + n * timeout`. Callers use it to size
    /// their own outer deadline.
    pub fn worst_case_duration(&self) -> Duration {
        PollPolicy::from_config(self)
            .total_delay()
            .saturating_add(self.per_attempt_timeout.saturating_mul(self.max_attempts))
    }
}

/// Collects raw parameters; `build` validates them all at once.
#[derive(Debug, Clone)]
pub struct CheckConfigBuilder {
    target: String,
    method: String,
    headers: Vec<(String, String)>,
    initial_delay: Duration,
    inter_attempt_delay: Duration,
    max_attempts: u32,
    per_attempt_timeout: Duration,
    expected_status: u32,
    expected_body_pattern: Option<String>,
    follow_redirects: bool,
}

impl CheckConfigBuilder {
    fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            method: DEFAULT_METHOD.to_string(),
            headers: Vec::new(),
            initial_delay: Duration::ZERO,
            inter_attempt_delay: Duration::from_secs(5),
            max_attempts: 10,
            per_attempt_timeout: Duration::from_secs(10),
            expected_status: 200,
            expected_body_pattern: None,
            follow_redirects: true,
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Add a header. A later call with the same name (any case) replaces it.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn inter_attempt_delay(mut self, delay: Duration) -> Self {
        self.inter_attempt_delay = delay;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn per_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.per_attempt_timeout = timeout;
        self
    }

    pub fn expected_status(mut self, status: u32) -> Self {
        self.expected_status = status;
        self
    }

    pub fn expected_body_pattern(mut self, pattern: Option<String>) -> Self {
        self.expected_body_pattern = pattern;
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn build(self) -> Result<CheckConfig, ConfigError> {
        let target = Url::parse(self.target.trim()).map_err(|source| ConfigError::InvalidUrl {
            url: self.target.clone(),
            source,
        })?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(target.scheme().to_string()));
        }

        let method = self.method.trim().to_ascii_uppercase();
        if method.is_empty() || !method.bytes().all(|b| b.is_ascii_alphabetic() || b == b'-') {
            return Err(ConfigError::InvalidMethod(self.method));
        }

        let mut headers = Headers::new();
        for (name, value) in &self.headers {
            headers.insert(name, value)?;
        }

        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        // libcurl counts timeouts in whole milliseconds and treats 0 as "never".
        if self.per_attempt_timeout < Duration::from_millis(1) {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.per_attempt_timeout > MAX_ATTEMPT_TIMEOUT {
            return Err(ConfigError::TimeoutTooLarge(self.per_attempt_timeout));
        }
        if !(100..=999).contains(&self.expected_status) {
            return Err(ConfigError::InvalidStatus(self.expected_status));
        }

        let expected_body_pattern = self
            .expected_body_pattern
            .as_deref()
            .map(BodyPattern::new)
            .transpose()?;

        Ok(CheckConfig {
            target,
            method,
            headers,
            initial_delay: self.initial_delay,
            inter_attempt_delay: self.inter_attempt_delay,
            max_attempts: self.max_attempts,
            per_attempt_timeout: self.per_attempt_timeout,
            expected_status: self.expected_status,
            expected_body_pattern,
            follow_redirects: self.follow_redirects,
        })
    }
}
