//! `healthgate check` – poll a URL until healthy or out of attempts.

use anyhow::{Context, Result};
use clap::Args;
use healthgate_core::check::{CheckConfig, Headers};
use healthgate_core::config::GateConfig;
use healthgate_core::{run_check_abortable, AbortToken, CurlEvaluator};
use std::process::ExitCode;
use std::time::Duration;

use crate::cli::report;

/// Flags for `check`. Anything left unset comes from the defaults file.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// HTTP/HTTPS URL to check.
    pub url: String,

    /// Extra request header, e.g. `-H 'Host: api.example.com'`. Repeatable.
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    pub headers: Vec<String>,

    /// Seconds to wait before the first request.
    #[arg(long, value_name = "SECS")]
    pub initial_delay: Option<u64>,

    /// Seconds to wait between tries.
    #[arg(long, value_name = "SECS")]
    pub delay_between_tries: Option<u64>,

    /// Number of tries before giving up.
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Seconds allowed for each request, connection setup included.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Status code that counts as healthy.
    #[arg(long, value_name = "CODE")]
    pub expected_status: Option<u32>,

    /// Regex the body must match from its first byte; use `.*OK` to search.
    #[arg(long, value_name = "REGEX")]
    pub expected_regexp: Option<String>,

    /// Request method.
    #[arg(long, short = 'X')]
    pub method: Option<String>,

    /// Treat 3xx responses as final instead of following them.
    #[arg(long)]
    pub no_follow_redirects: bool,

    /// Print a JSON report instead of a human-readable line.
    #[arg(long)]
    pub json: bool,
}

/// Merge defaults with flags and validate the result.
pub(crate) fn build_check_config(cfg: &GateConfig, args: &CheckArgs) -> Result<CheckConfig> {
    let mut builder = cfg.check_builder(&args.url);
    for line in &args.headers {
        let (name, value) = Headers::parse_line(line)?;
        builder = builder.header(name, value);
    }
    if let Some(secs) = args.initial_delay {
        builder = builder.initial_delay(Duration::from_secs(secs));
    }
    if let Some(secs) = args.delay_between_tries {
        builder = builder.inter_attempt_delay(Duration::from_secs(secs));
    }
    if let Some(n) = args.max_attempts {
        builder = builder.max_attempts(n);
    }
    if let Some(secs) = args.timeout {
        builder = builder.per_attempt_timeout(Duration::from_secs(secs));
    }
    if let Some(code) = args.expected_status {
        builder = builder.expected_status(code);
    }
    if let Some(method) = &args.method {
        builder = builder.method(method.clone());
    }
    if args.no_follow_redirects {
        builder = builder.follow_redirects(false);
    }
    builder
        .expected_body_pattern(args.expected_regexp.clone())
        .build()
        .with_context(|| format!("invalid health check for {}", args.url))
}

pub async fn run_check(cfg: &GateConfig, args: CheckArgs) -> Result<ExitCode> {
    let check = build_check_config(cfg, &args)?;
    let target = check.target().to_string();
    tracing::info!(
        target_url = %target,
        max_attempts = check.max_attempts(),
        worst_case_secs = check.worst_case_duration().as_secs(),
        "waiting for endpoint to become healthy"
    );

    let abort = AbortToken::new();
    let worker_abort = abort.clone();
    let mut worker = tokio::task::spawn_blocking(move || {
        let mut evaluator = CurlEvaluator::with_abort(worker_abort.clone());
        run_check_abortable(&check, &mut evaluator, &worker_abort)
    });

    let joined = tokio::select! {
        res = &mut worker => res,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupt received, aborting health check");
            abort.abort();
            worker.await
        }
    };
    let outcome = joined.context("health check worker failed")?;
    report::emit(&outcome, &target, args.json)
}
