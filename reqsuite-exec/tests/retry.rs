use std::time::Duration;

use reqsuite_exec::retry::{
    decide_retry, AttemptFailure, BackoffPolicy, RetryConfig, RetryDecision, StopReason,
};

#[test]
fn zero_retries_stops_after_first_failure() {
    let decision = decide_retry(
        &RetryConfig::default(),
        1,
        0,
        &AttemptFailure::Timeout,
        || 0,
    );
    assert_eq!(
        decision,
        RetryDecision::Stop {
            reason: StopReason::AttemptsExhausted
        }
    );
}

#[test]
fn budget_allows_exactly_retries_plus_one_attempts() {
    let cfg = RetryConfig::default();
    let failure = AttemptFailure::Network("connection refused".to_string());

    for attempt_no in 1..=2 {
        assert!(matches!(
            decide_retry(&cfg, attempt_no, 2, &failure, || 0),
            RetryDecision::RetryAfter { .. }
        ));
    }
    assert_eq!(
        decide_retry(&cfg, 3, 2, &failure, || 0),
        RetryDecision::Stop {
            reason: StopReason::AttemptsExhausted
        }
    );
}

#[test]
fn immediate_backoff_has_zero_delay() {
    let decision = decide_retry(
        &RetryConfig::default(),
        1,
        1,
        &AttemptFailure::Timeout,
        || 0,
    );
    assert_eq!(
        decision,
        RetryDecision::RetryAfter {
            delay: Duration::ZERO
        }
    );
}

#[test]
fn status_failure_is_retryable_only_for_configured_statuses() {
    let cfg = RetryConfig::default();

    assert_eq!(
        decide_retry(&cfg, 1, 3, &AttemptFailure::HttpStatus(404), || 0),
        RetryDecision::Stop {
            reason: StopReason::HttpStatus(404)
        }
    );
    assert!(matches!(
        decide_retry(&cfg, 1, 3, &AttemptFailure::HttpStatus(503), || 0),
        RetryDecision::RetryAfter { .. }
    ));
}

#[test]
fn terminal_transport_failure_never_retries() {
    let decision = decide_retry(
        &RetryConfig::default(),
        1,
        5,
        &AttemptFailure::Terminal("bad method".to_string()),
        || 0,
    );
    assert_eq!(
        decision,
        RetryDecision::Stop {
            reason: StopReason::NotRetryable
        }
    );
}

#[test]
fn fixed_backoff_waits_the_configured_duration() {
    let cfg = RetryConfig {
        backoff: BackoffPolicy::Fixed(Duration::from_millis(250)),
        ..Default::default()
    };

    assert_eq!(
        decide_retry(&cfg, 1, 1, &AttemptFailure::Timeout, || 0),
        RetryDecision::RetryAfter {
            delay: Duration::from_millis(250)
        }
    );
}

#[test]
fn exponential_jitter_is_bounded_by_max() {
    let backoff = BackoffPolicy::ExponentialJitter {
        base: Duration::from_millis(100),
        factor: 2.0,
        max: Duration::from_millis(150),
    };

    for attempt_no in 1..=6 {
        let delay = backoff.delay_for(attempt_no, || 987_654_321);
        assert!(delay <= Duration::from_millis(150), "attempt {attempt_no}: {delay:?}");
    }
}

#[test]
fn exponential_jitter_grows_with_attempts_before_the_cap() {
    let backoff = BackoffPolicy::ExponentialJitter {
        base: Duration::from_millis(100),
        factor: 2.0,
        max: Duration::from_secs(60),
    };

    // A jitter source returning the raw backoff keeps the full delay.
    let first = backoff.delay_for(1, || 100);
    let third = backoff.delay_for(3, || 400);
    assert_eq!(first, Duration::from_millis(100));
    assert_eq!(third, Duration::from_millis(400));
    assert!(third > first);
}
