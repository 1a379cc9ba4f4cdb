use async_trait::async_trait;
use uuid::Uuid;

/// Structured observability events emitted as a run progresses. Sinks are the
/// engine's reporting seam; the engine itself never prints or installs a
/// tracing subscriber.
#[derive(Debug, Clone)]
pub enum Event {
    RunStarted {
        run_id: Uuid,
        request_count: usize,
    },
    RunFinished {
        run_id: Uuid,
        success: bool,
    },
    RequestStarted {
        run_id: Uuid,
        name: String,
    },
    RequestSucceeded {
        run_id: Uuid,
        name: String,
        attempts: u32,
    },
    RequestFailed {
        run_id: Uuid,
        name: String,
    },
    RequestSkipped {
        run_id: Uuid,
        name: String,
        dependency: String,
    },
    AttemptStarted {
        run_id: Uuid,
        name: String,
        attempt_no: u32,
    },
    AttemptFinished {
        run_id: Uuid,
        name: String,
        attempt_no: u32,
        succeeded: bool,
    },
    RetryScheduled {
        run_id: Uuid,
        name: String,
        delay_ms: u64,
    },
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}

/// Forwards events to the `tracing` crate at info/warn level.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: Event) {
        match event {
            Event::RunStarted {
                run_id,
                request_count,
            } => {
                tracing::info!(%run_id, request_count, "run started");
            }
            Event::RunFinished { run_id, success } => {
                tracing::info!(%run_id, success, "run finished");
            }
            Event::RequestStarted { run_id, name } => {
                tracing::info!(%run_id, %name, "request started");
            }
            Event::RequestSucceeded {
                run_id,
                name,
                attempts,
            } => {
                tracing::info!(%run_id, %name, attempts, "request succeeded");
            }
            Event::RequestFailed { run_id, name } => {
                tracing::warn!(%run_id, %name, "request failed");
            }
            Event::RequestSkipped {
                run_id,
                name,
                dependency,
            } => {
                tracing::warn!(%run_id, %name, %dependency, "request skipped");
            }
            Event::AttemptStarted {
                run_id,
                name,
                attempt_no,
            } => {
                tracing::debug!(%run_id, %name, attempt_no, "attempt started");
            }
            Event::AttemptFinished {
                run_id,
                name,
                attempt_no,
                succeeded,
            } => {
                tracing::debug!(%run_id, %name, attempt_no, succeeded, "attempt finished");
            }
            Event::RetryScheduled {
                run_id,
                name,
                delay_ms,
            } => {
                tracing::info!(%run_id, %name, delay_ms, "retry scheduled");
            }
        }
    }
}
