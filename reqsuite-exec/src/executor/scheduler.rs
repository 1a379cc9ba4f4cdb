use std::sync::Arc;

use chrono::Utc;
use reqsuite_core::{build_graph, DependencyGraph, RequestSet};
use uuid::Uuid;

use crate::executor::concurrency::WorkerLimit;
use crate::executor::events::{Event, EventSink};
use crate::executor::http::HttpClient;
use crate::executor::result::{
    ExecutionError, ExecutionOutcome, OutcomeTable, RunReport,
};
use crate::executor::types::ExecutorConfig;
use crate::executor::worker::{run_request, RequestContext, RequestDeps};

/// Drives a whole run: builds the dependency graph, walks its levels in
/// order, dispatches independent requests concurrently, and propagates skips
/// across failed subtrees. Control decisions (level advancement, skip checks)
/// stay on this task; only request execution is spawned.
pub struct Executor {
    config: ExecutorConfig,
    http: Arc<dyn HttpClient>,
    event_sink: Arc<dyn EventSink>,
}

impl Executor {
    pub fn new(
        config: ExecutorConfig,
        http: Arc<dyn HttpClient>,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            http,
            event_sink,
        }
    }

    pub async fn execute_run(
        &self,
        run_id: Uuid,
        set: &RequestSet,
    ) -> Result<RunReport, ExecutionError> {
        // Graph-build errors abort the run before anything is dispatched.
        let graph = build_graph(&set.requests)?;

        let started_at = Utc::now();
        let limits = WorkerLimit::new(self.config.max_concurrency);
        let outcomes = OutcomeTable::default();

        self.event_sink
            .emit(Event::RunStarted {
                run_id,
                request_count: set.requests.len(),
            })
            .await;

        for level in &graph.levels {
            let mut handles = Vec::new();

            for name in level {
                if let Some(blocked_on) = self.blocked_dependency(&graph, &outcomes, name) {
                    outcomes.record(name, ExecutionOutcome::skipped(&blocked_on));
                    self.event_sink
                        .emit(Event::RequestSkipped {
                            run_id,
                            name: name.clone(),
                            dependency: blocked_on,
                        })
                        .await;
                    continue;
                }

                let definition = set
                    .requests
                    .get(name)
                    .ok_or_else(|| ExecutionError::RequestNotFound(name.clone()))?;

                let ctx = RequestContext {
                    run_id,
                    name: name.clone(),
                    definition: definition.clone(),
                    environment: set.environment.clone(),
                };
                let deps = RequestDeps {
                    http: self.http.clone(),
                    event_sink: self.event_sink.clone(),
                    config: self.config.clone(),
                    limits: limits.clone(),
                };

                let handle = tokio::spawn(async move { run_request(ctx, deps).await });
                handles.push((name.clone(), handle));
            }

            // A later level must not start until every request in this level
            // is terminal.
            for (name, handle) in handles {
                let outcome = handle
                    .await
                    .map_err(|e| ExecutionError::TaskJoin(format!("request {name}: {e}")))?;
                outcomes.record(&name, outcome);
            }
        }

        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcomes: outcomes.into_outcomes(),
        };

        self.event_sink
            .emit(Event::RunFinished {
                run_id,
                success: report.success(),
            })
            .await;

        Ok(report)
    }

    /// The first dependency that ended `Failed` or `Skipped`, if any. All
    /// dependencies live in earlier levels, so their outcomes are already
    /// recorded when this runs.
    fn blocked_dependency(
        &self,
        graph: &DependencyGraph,
        outcomes: &OutcomeTable,
        name: &str,
    ) -> Option<String> {
        graph
            .dependencies_of(name)
            .iter()
            .find(|dep| {
                outcomes
                    .get(dep)
                    .is_some_and(|o| o.is_terminal_failure())
            })
            .cloned()
    }
}
