use std::time::Duration;

use crate::retry::config::RetryConfig;

/// How one attempt of a request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    Timeout,
    Network(String),
    /// A completed exchange with a non-success status, only produced when the
    /// caller opted into status-code failure.
    HttpStatus(u16),
    /// A transport-level failure that is not worth repeating (malformed
    /// method, oversized response, protocol error).
    Terminal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter { delay: Duration },
    Stop { reason: StopReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    AttemptsExhausted,
    NotRetryable,
    HttpStatus(u16),
}

/// Decide if we should retry and how long to wait.
///
/// - `attempt_no`: 1-based attempt number just completed.
/// - `retries`: the request's configured retry budget; total attempts are
///   `retries + 1`.
///
/// Timeouts and network errors are always retryable within the budget; status
/// failures only when the status is in `cfg.retry_statuses`; terminal
/// transport failures never.
pub fn decide_retry(
    cfg: &RetryConfig,
    attempt_no: usize,
    retries: u32,
    failure: &AttemptFailure,
    rand_u64: impl Fn() -> u64,
) -> RetryDecision {
    let max_attempts = retries as usize + 1;
    if attempt_no >= max_attempts {
        return RetryDecision::Stop {
            reason: StopReason::AttemptsExhausted,
        };
    }

    match failure {
        AttemptFailure::Timeout | AttemptFailure::Network(_) => {}
        AttemptFailure::HttpStatus(status) => {
            if !cfg.retry_statuses.contains(status) {
                return RetryDecision::Stop {
                    reason: StopReason::HttpStatus(*status),
                };
            }
        }
        AttemptFailure::Terminal(_) => {
            return RetryDecision::Stop {
                reason: StopReason::NotRetryable,
            };
        }
    }

    RetryDecision::RetryAfter {
        delay: cfg.backoff.delay_for(attempt_no, rand_u64),
    }
}
