mod config;
mod decision;

pub use config::{BackoffPolicy, RetryConfig};
pub use decision::{decide_retry, AttemptFailure, RetryDecision, StopReason};
