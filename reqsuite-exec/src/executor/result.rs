use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use reqsuite_core::GraphError;

/// Terminal status of one request. No further transitions occur once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Succeeded,
    Failed,
    Skipped,
}

/// Root cause carried by `Failed` and `Skipped` outcomes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutcomeError {
    /// Placeholder resolution, URL parsing or body serialization failed; the
    /// request was never dispatched.
    Build { message: String },
    Timeout,
    Network { message: String },
    HttpStatus { status: u16 },
    ResponseTooLarge,
    Transport { message: String },
    /// A required request ended `Failed` or `Skipped`.
    SkippedDependency { dependency: String },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResponseSummary {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl ResponseSummary {
    /// The body decoded as UTF-8, for report rendering.
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// The per-request record written exactly once per run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionOutcome {
    pub status: RequestStatus,
    pub attempts: u32,
    pub elapsed: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,
}

impl ExecutionOutcome {
    pub fn succeeded(attempts: u32, elapsed: Duration, response: ResponseSummary) -> Self {
        Self {
            status: RequestStatus::Succeeded,
            attempts,
            elapsed,
            response: Some(response),
            error: None,
        }
    }

    pub fn failed(attempts: u32, elapsed: Duration, error: OutcomeError) -> Self {
        Self {
            status: RequestStatus::Failed,
            attempts,
            elapsed,
            response: None,
            error: Some(error),
        }
    }

    pub fn skipped(dependency: &str) -> Self {
        Self {
            status: RequestStatus::Skipped,
            attempts: 0,
            elapsed: Duration::ZERO,
            response: None,
            error: Some(OutcomeError::SkippedDependency {
                dependency: dependency.to_string(),
            }),
        }
    }

    pub fn is_terminal_failure(&self) -> bool {
        matches!(self.status, RequestStatus::Failed | RequestStatus::Skipped)
    }
}

/// The shared outcome table. Workers write distinct keys; the scheduler reads
/// dependency statuses between levels. Each key is written exactly once.
#[derive(Debug, Clone, Default)]
pub struct OutcomeTable {
    inner: Arc<RwLock<HashMap<String, ExecutionOutcome>>>,
}

impl OutcomeTable {
    pub fn record(&self, name: &str, outcome: ExecutionOutcome) {
        let mut table = self
            .inner
            .write()
            .unwrap_or_else(|e| panic!("outcome table lock poisoned: {e}"));
        let previous = table.insert(name.to_string(), outcome);
        debug_assert!(previous.is_none(), "outcome for {name:?} written twice");
    }

    pub fn status_of(&self, name: &str) -> Option<RequestStatus> {
        self.inner
            .read()
            .unwrap_or_else(|e| panic!("outcome table lock poisoned: {e}"))
            .get(name)
            .map(|o| o.status)
    }

    pub fn get(&self, name: &str) -> Option<ExecutionOutcome> {
        self.inner
            .read()
            .unwrap_or_else(|e| panic!("outcome table lock poisoned: {e}"))
            .get(name)
            .cloned()
    }

    pub fn into_outcomes(self) -> BTreeMap<String, ExecutionOutcome> {
        let inner = Arc::try_unwrap(self.inner)
            .map(|lock| {
                lock.into_inner()
                    .unwrap_or_else(|e| panic!("outcome table lock poisoned: {e}"))
            })
            .unwrap_or_else(|arc| {
                arc.read()
                    .unwrap_or_else(|e| panic!("outcome table lock poisoned: {e}"))
                    .clone()
            });
        inner.into_iter().collect()
    }
}

/// The aggregated report for one run, keyed by request name.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: BTreeMap<String, ExecutionOutcome>,
}

impl RunReport {
    /// True iff every request in the run succeeded.
    pub fn success(&self) -> bool {
        self.outcomes
            .values()
            .all(|o| o.status == RequestStatus::Succeeded)
    }

    pub fn outcome(&self, name: &str) -> Option<&ExecutionOutcome> {
        self.outcomes.get(name)
    }
}

/// Run-fatal errors. Per-request failures never surface here; they are
/// contained to the offending request and its dependents via the outcome
/// table.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("request not found in set: {0}")]
    RequestNotFound(String),
    #[error("task join error: {0}")]
    TaskJoin(String),
}
