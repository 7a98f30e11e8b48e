//! Configuration errors raised while building a `CheckConfig`.

use thiserror::Error;

/// A parameter failed validation. Raised once, at construction; the retry
/// loop never sees an invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid target URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),

    #[error("max attempts must be at least 1")]
    ZeroAttempts,

    #[error("per-attempt timeout must be at least 1ms")]
    ZeroTimeout,

    #[error("per-attempt timeout of {0:?} exceeds the maximum of {max:?}", max = super::MAX_ATTEMPT_TIMEOUT)]
    TimeoutTooLarge(std::time::Duration),

    #[error("{0} is not a valid HTTP status code")]
    InvalidStatus(u32),

    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),

    #[error("invalid header name {0:?}")]
    InvalidHeaderName(String),

    #[error("invalid value for header {0:?}")]
    InvalidHeaderValue(String),

    /// A `Name: value` header line without a colon.
    #[error("malformed header {0:?} (expected \"Name: value\")")]
    MalformedHeader(String),

    #[error("invalid expected body pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
