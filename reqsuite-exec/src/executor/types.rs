use std::time::Duration;

use crate::retry::RetryConfig;

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Worker pool size. `None` removes the bound entirely.
    pub max_concurrency: Option<usize>,
    /// Per-attempt wall-clock bound for requests without their own `timeout`.
    pub default_timeout: Duration,
    /// Response body size cap per attempt.
    pub max_response_bytes: usize,
    /// When set, a completed exchange with a non-2xx status fails the attempt.
    /// Off by default: only transport and timeout errors fail an attempt.
    pub fail_on_status: bool,
    pub retry: RetryConfig,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: Some(10),
            default_timeout: Duration::from_secs(30),
            max_response_bytes: 4 * 1024 * 1024,
            fail_on_status: false,
            retry: RetryConfig::default(),
        }
    }
}
