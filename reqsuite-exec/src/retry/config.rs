use std::collections::BTreeSet;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay between attempts. The source format only carries a retry count,
    /// so the default is an immediate retry; callers opting into a backoff
    /// pick one of the other policies.
    pub backoff: BackoffPolicy,
    /// Statuses considered retryable when status-code failure is enabled
    /// (`ExecutorConfig::fail_on_status`).
    pub retry_statuses: BTreeSet<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            backoff: BackoffPolicy::Immediate,
            retry_statuses: [408u16, 429, 502, 503, 504].into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackoffPolicy {
    /// Retry with no intervening wait.
    Immediate,
    /// The same wait before every retry.
    Fixed(Duration),
    /// `base * factor^(attempt_no-1)` capped at `max`, with full jitter.
    ExponentialJitter {
        base: Duration,
        factor: f64,
        max: Duration,
    },
}

impl BackoffPolicy {
    /// The wait before the attempt following failed attempt `attempt_no`
    /// (1-based). `rand_u64` supplies the jitter source.
    pub fn delay_for(&self, attempt_no: usize, rand_u64: impl Fn() -> u64) -> Duration {
        match self {
            BackoffPolicy::Immediate => Duration::ZERO,
            BackoffPolicy::Fixed(d) => *d,
            BackoffPolicy::ExponentialJitter { base, factor, max } => {
                let exp = (attempt_no.saturating_sub(1)) as i32;
                let raw = (base.as_millis() as f64) * factor.powi(exp);
                let raw_ms = raw.min(max.as_millis() as f64).max(0.0) as u64;
                let jitter_ms = if raw_ms == 0 { 0 } else { rand_u64() % (raw_ms + 1) };
                Duration::from_millis(jitter_ms)
            }
        }
    }
}
