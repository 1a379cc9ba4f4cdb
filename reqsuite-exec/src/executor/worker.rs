use std::sync::Arc;
use std::time::Instant;

use reqsuite_core::{Environment, RequestDefinition};
use uuid::Uuid;

use crate::executor::concurrency::WorkerLimit;
use crate::executor::events::{Event, EventSink};
use crate::executor::http::{HttpClient, HttpError};
use crate::executor::request::build_request;
use crate::executor::result::{ExecutionOutcome, OutcomeError, RequestStatus, ResponseSummary};
use crate::executor::types::ExecutorConfig;
use crate::retry::{decide_retry, AttemptFailure, RetryDecision};

pub struct RequestContext {
    pub run_id: Uuid,
    pub name: String,
    pub definition: RequestDefinition,
    pub environment: Environment,
}

pub struct RequestDeps {
    pub http: Arc<dyn HttpClient>,
    pub event_sink: Arc<dyn EventSink>,
    pub config: ExecutorConfig,
    pub limits: WorkerLimit,
}

pub struct Worker<'a> {
    pub http: &'a dyn HttpClient,
    pub event_sink: &'a dyn EventSink,
    pub config: &'a ExecutorConfig,
}

/// Drives one request to a terminal outcome: wait out the configured `delay`,
/// take a worker permit, then run the attempt loop. The delay is a pure wait;
/// it happens before the permit is held and is not counted against `timeout`.
pub async fn run_request(ctx: RequestContext, deps: RequestDeps) -> ExecutionOutcome {
    if let Some(delay) = ctx.definition.delay() {
        tokio::time::sleep(delay).await;
    }
    let _permit = deps.limits.acquire().await;

    deps.event_sink
        .emit(Event::RequestStarted {
            run_id: ctx.run_id,
            name: ctx.name.clone(),
        })
        .await;

    let worker = Worker {
        http: deps.http.as_ref(),
        event_sink: deps.event_sink.as_ref(),
        config: &deps.config,
    };

    let outcome = execute_request(
        &worker,
        ctx.run_id,
        &ctx.name,
        &ctx.definition,
        &ctx.environment,
    )
    .await;

    match outcome.status {
        RequestStatus::Succeeded => {
            deps.event_sink
                .emit(Event::RequestSucceeded {
                    run_id: ctx.run_id,
                    name: ctx.name.clone(),
                    attempts: outcome.attempts,
                })
                .await;
        }
        _ => {
            deps.event_sink
                .emit(Event::RequestFailed {
                    run_id: ctx.run_id,
                    name: ctx.name.clone(),
                })
                .await;
        }
    }

    outcome
}

/// Executes the attempt loop for one resolved request. Total attempts are
/// bounded by `retries + 1`; the per-attempt timeout is enforced both through
/// the client and with an outer `tokio::time::timeout`, so an expired attempt
/// is cancelled rather than left in flight.
pub async fn execute_request(
    worker: &Worker<'_>,
    run_id: Uuid,
    name: &str,
    definition: &RequestDefinition,
    environment: &Environment,
) -> ExecutionOutcome {
    let start = Instant::now();

    let parts = match build_request(definition, environment).await {
        Ok(parts) => parts,
        Err(e) => {
            return ExecutionOutcome::failed(
                0,
                start.elapsed(),
                OutcomeError::Build {
                    message: e.to_string(),
                },
            );
        }
    };

    let timeout = definition
        .timeout()
        .unwrap_or(worker.config.default_timeout);
    let retries = definition.retries();

    let mut attempt_no: u32 = 1;
    loop {
        worker
            .event_sink
            .emit(Event::AttemptStarted {
                run_id,
                name: name.to_string(),
                attempt_no,
            })
            .await;

        let sent = match tokio::time::timeout(
            timeout,
            worker
                .http
                .send(parts.clone(), timeout, worker.config.max_response_bytes),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(HttpError::Timeout),
        };

        let (failure, error) = match sent {
            Ok(resp) => {
                let success = !worker.config.fail_on_status || (200..300).contains(&resp.status);
                if success {
                    worker
                        .event_sink
                        .emit(Event::AttemptFinished {
                            run_id,
                            name: name.to_string(),
                            attempt_no,
                            succeeded: true,
                        })
                        .await;
                    return ExecutionOutcome::succeeded(
                        attempt_no,
                        start.elapsed(),
                        ResponseSummary {
                            status: resp.status,
                            headers: resp.headers,
                            body: resp.body,
                        },
                    );
                }
                (
                    AttemptFailure::HttpStatus(resp.status),
                    OutcomeError::HttpStatus {
                        status: resp.status,
                    },
                )
            }
            Err(err) => classify(err),
        };

        worker
            .event_sink
            .emit(Event::AttemptFinished {
                run_id,
                name: name.to_string(),
                attempt_no,
                succeeded: false,
            })
            .await;

        match decide_retry(
            &worker.config.retry,
            attempt_no as usize,
            retries,
            &failure,
            || fastrand::u64(..),
        ) {
            RetryDecision::RetryAfter { delay } => {
                worker
                    .event_sink
                    .emit(Event::RetryScheduled {
                        run_id,
                        name: name.to_string(),
                        delay_ms: delay.as_millis() as u64,
                    })
                    .await;
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt_no += 1;
            }
            RetryDecision::Stop { .. } => {
                return ExecutionOutcome::failed(attempt_no, start.elapsed(), error);
            }
        }
    }
}

fn classify(err: HttpError) -> (AttemptFailure, OutcomeError) {
    match err {
        HttpError::Timeout => (AttemptFailure::Timeout, OutcomeError::Timeout),
        HttpError::Network(message) => (
            AttemptFailure::Network(message.clone()),
            OutcomeError::Network { message },
        ),
        HttpError::ResponseTooLarge { max_bytes } => (
            AttemptFailure::Terminal(format!("response body exceeded {max_bytes} bytes")),
            OutcomeError::ResponseTooLarge,
        ),
        HttpError::Other(message) => (
            AttemptFailure::Terminal(message.clone()),
            OutcomeError::Transport { message },
        ),
    }
}
