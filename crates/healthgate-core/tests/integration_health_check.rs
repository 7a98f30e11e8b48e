//! Integration test: real libcurl attempts against a local scripted server.
//!
//! Covers the full path from `CheckConfig` through the curl evaluator and
//! the retry loop: status matching, anchored body patterns, timeouts,
//! refused connections, headers, redirects and abort.

mod common;

use std::time::{Duration, Instant};

use common::health_server::{self, Reply};
use healthgate_core::probe::{self, AttemptError, AttemptOutcome};
use healthgate_core::retry::{run_check, run_check_abortable, FailureKind};
use healthgate_core::{AbortToken, CheckConfig, CurlEvaluator};

fn quick(url: &str) -> healthgate_core::check::CheckConfigBuilder {
    CheckConfig::builder(url)
        .initial_delay(Duration::ZERO)
        .inter_attempt_delay(Duration::from_millis(10))
        .per_attempt_timeout(Duration::from_secs(5))
}

#[test]
fn healthy_on_first_attempt() {
    let server = health_server::always(200, "OK");
    let cfg = quick(&server.url).max_attempts(3).build().unwrap();
    let r = run_check(&cfg);
    assert!(r.succeeded);
    assert_eq!(r.attempts_made, 1);
    assert_eq!(r.last_detail, "OK");
    assert_eq!(server.hits(), 1);
}

#[test]
fn recovers_after_unavailable_responses() {
    let server = health_server::start(vec![
        Reply::Status(503, "starting"),
        Reply::Status(503, "starting"),
        Reply::Status(200, "ready"),
    ]);
    let cfg = quick(&server.url).max_attempts(5).build().unwrap();
    let r = run_check(&cfg);
    assert!(r.succeeded);
    assert_eq!(r.attempts_made, 3);
    assert_eq!(r.failed_attempts(), 2);
    assert_eq!(server.hits(), 3);
}

#[test]
fn gives_up_on_persistent_status_mismatch() {
    let server = health_server::always(503, "down");
    let cfg = quick(&server.url).max_attempts(2).build().unwrap();
    let r = run_check(&cfg);
    assert!(!r.succeeded);
    assert_eq!(r.attempts_made, 2);
    assert!(r.last_detail.contains("200"), "{}", r.last_detail);
    assert!(r.last_detail.contains("503"), "{}", r.last_detail);
    assert_eq!(r.last_failure, Some(FailureKind::Status(503)));
    assert_eq!(server.hits(), 2);
}

#[test]
fn error_status_can_be_expected() {
    let server = health_server::always(404, "not here");
    let cfg = quick(&server.url).expected_status(404).max_attempts(1).build().unwrap();
    assert_eq!(probe::evaluate(&cfg, None), AttemptOutcome::Healthy);
}

#[test]
fn body_pattern_matches_prefix_only() {
    let server = health_server::always(200, "okay, proceeding");
    let cfg = quick(&server.url)
        .expected_body_pattern(Some("ok".into()))
        .build()
        .unwrap();
    assert_eq!(probe::evaluate(&cfg, None), AttemptOutcome::Healthy);

    let server = health_server::always(200, "not ok");
    let cfg = quick(&server.url)
        .expected_body_pattern(Some("ok".into()))
        .build()
        .unwrap();
    let outcome = probe::evaluate(&cfg, None);
    assert_eq!(outcome, AttemptOutcome::Unhealthy(AttemptError::BodyMismatch));
    assert_eq!(outcome.detail(), "content did not match expected pattern");
}

#[test]
fn empty_body_can_match() {
    let server = health_server::always(200, "");
    let cfg = quick(&server.url)
        .expected_body_pattern(Some("x*".into()))
        .build()
        .unwrap();
    assert!(probe::evaluate(&cfg, None).is_success());
}

#[test]
fn slow_server_times_out_and_loop_moves_on() {
    let server = health_server::start(vec![Reply::Hang(Duration::from_secs(3))]);
    let cfg = quick(&server.url)
        .per_attempt_timeout(Duration::from_millis(300))
        .max_attempts(2)
        .build()
        .unwrap();
    let start = Instant::now();
    let r = run_check(&cfg);
    assert!(!r.succeeded);
    assert_eq!(r.attempts_made, 2);
    assert_eq!(r.last_failure, Some(FailureKind::Timeout));
    assert!(
        start.elapsed() < Duration::from_millis(2500),
        "took {:?}",
        start.elapsed()
    );
}

#[test]
fn refused_connection_is_a_transport_failure() {
    let cfg = quick(&health_server::refused_url()).max_attempts(1).build().unwrap();
    match probe::evaluate(&cfg, None) {
        AttemptOutcome::Unhealthy(AttemptError::Transport { message, timed_out }) => {
            assert!(!message.is_empty());
            assert!(!timed_out);
        }
        other => panic!("expected transport failure, got {:?}", other),
    }
}

#[test]
fn configured_headers_are_sent() {
    let server = health_server::always(200, "OK");
    let cfg = quick(&server.url)
        .header("Host", "api.example.com")
        .header("X-Gate", "first")
        .header("x-gate", "second")
        .build()
        .unwrap();
    assert!(probe::evaluate(&cfg, None).is_success());

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let head = requests[0].to_ascii_lowercase();
    assert!(head.starts_with("get /health "), "{}", head);
    assert!(head.contains("host: api.example.com"), "{}", head);
    assert!(head.contains("x-gate: second"), "{}", head);
    assert!(!head.contains("x-gate: first"), "{}", head);
}

#[test]
fn head_method_checks_status_only() {
    let server = health_server::always(200, "ignored");
    let cfg = quick(&server.url).method("HEAD").build().unwrap();
    assert!(probe::evaluate(&cfg, None).is_success());
    assert!(server.requests()[0].starts_with("HEAD "));
}

#[test]
fn redirects_are_followed_unless_disabled() {
    let server = health_server::start(vec![Reply::Redirect("/ready"), Reply::Status(200, "OK")]);
    let cfg = quick(&server.url).build().unwrap();
    assert!(probe::evaluate(&cfg, None).is_success());
    assert_eq!(server.hits(), 2);

    let redirecting = health_server::start(vec![Reply::Redirect("/elsewhere"), Reply::Status(200, "OK")]);
    let cfg = quick(&redirecting.url).follow_redirects(false).build().unwrap();
    assert_eq!(
        probe::evaluate(&cfg, None),
        AttemptOutcome::Unhealthy(AttemptError::StatusMismatch {
            expected: 200,
            actual: 302
        })
    );
    assert_eq!(redirecting.hits(), 1);
}

#[test]
fn abort_cuts_off_in_flight_request() {
    let server = health_server::start(vec![Reply::Hang(Duration::from_secs(3))]);
    let cfg = quick(&server.url)
        .per_attempt_timeout(Duration::from_secs(30))
        .max_attempts(5)
        .build()
        .unwrap();
    let token = AbortToken::new();
    let remote = token.clone();
    let aborter = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(300));
        remote.abort();
    });

    let start = Instant::now();
    let mut evaluator = CurlEvaluator::with_abort(token.clone());
    let err = run_check_abortable(&cfg, &mut evaluator, &token).unwrap_err();
    aborter.join().unwrap();
    assert_eq!(err.attempts_made, 1);
    assert!(start.elapsed() < Duration::from_millis(2500), "took {:?}", start.elapsed());
}
