//! Dispatch loop: poll a queue, run the matching handler, report the result

use crate::activity::{ActivityContext, ActivityContextImpl};
use crate::client::Courier;
use crate::error::CourierError;
use crate::queue::TaskQueue;
use crate::registry::{Handler, RegisteredActivity, RegisteredWorkflow};
use crate::worker::metrics::MetricsRecorder;
use crate::workflow::{FanOutFuture, WorkflowContext};
use chrono::Utc;
use courier_core::{DispatchState, Task, TaskKind, WorkerStatus};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, trace, warn};

/// A workflow running on its own task
pub(crate) struct RunningWorkflow {
    /// Resolves the workflow's token once the body finishes
    pub resolver: JoinHandle<()>,
    /// The workflow body
    pub body: AbortHandle,
}

/// State shared by a worker's loops and its handle
pub(crate) struct WorkerShared {
    pub status: RwLock<WorkerStatus>,
    pub metrics: MetricsRecorder,
    pub states: Mutex<Vec<DispatchState>>,
    pub workflows: Mutex<Vec<RunningWorkflow>>,
}

impl WorkerShared {
    pub fn new(loops: usize) -> Self {
        Self {
            status: RwLock::new(WorkerStatus::Initializing),
            metrics: MetricsRecorder::default(),
            states: Mutex::new(vec![DispatchState::Idle; loops]),
            workflows: Mutex::new(Vec::new()),
        }
    }

    fn track_workflow(&self, workflow: RunningWorkflow) {
        let mut workflows = self.workflows.lock();
        workflows.retain(|w| !w.resolver.is_finished());
        workflows.push(workflow);
    }
}

pub(crate) struct DispatchLoop {
    pub id: usize,
    pub queue: TaskQueue,
    pub courier: Courier,
    pub shared: Arc<WorkerShared>,
    pub poll_timeout: Duration,
    pub shutdown: watch::Receiver<bool>,
}

impl DispatchLoop {
    pub async fn run(mut self) {
        debug!(queue = %self.queue.name(), loop_id = self.id, "Dispatch loop started");

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            self.transition(DispatchState::Polling);
            let polled = tokio::select! {
                biased;
                _ = self.shutdown.changed() => None,
                task = self.queue.recv_timeout(self.poll_timeout) => Some(task),
            };

            let Some(polled) = polled else {
                self.transition(DispatchState::Idle);
                break;
            };
            let Some(task) = polled else {
                self.transition(DispatchState::Idle);
                continue;
            };

            self.transition(DispatchState::Executing);
            let outcome = self.execute(task).await;
            self.transition(outcome);
            self.transition(DispatchState::Idle);
        }

        debug!(queue = %self.queue.name(), loop_id = self.id, "Dispatch loop stopped");
    }

    fn transition(&self, next: DispatchState) {
        let mut states = self.shared.states.lock();
        if let Some(state) = states.get_mut(self.id) {
            debug_assert!(
                state.can_transition_to(next),
                "illegal dispatch transition {} -> {}",
                state,
                next
            );
            trace!(loop_id = self.id, from = %state, to = %next, "Dispatch transition");
            *state = next;
        }
    }

    /// Execute one task; returns `Completed` or `Deferred`
    async fn execute(&self, task: Task) -> DispatchState {
        self.shared.metrics.record_polled();
        debug!(
            queue = %task.queue,
            task_id = %task.id,
            kind = %task.kind,
            name = %task.name,
            queued_ms = (Utc::now() - task.scheduled_at).num_milliseconds(),
            "Polled task"
        );

        let registry = self.courier.registry();
        let lookup = match task.kind {
            TaskKind::Activity => registry
                .lookup_activity(&task.queue, &task.name)
                .map(Handler::Activity),
            TaskKind::Workflow => registry
                .lookup_workflow(&task.queue, &task.name)
                .map(Handler::Workflow),
        };

        let handler = match lookup {
            Ok(handler) => handler,
            Err(e) => {
                warn!(queue = %task.queue, task_id = %task.id, name = %task.name, "No handler registered");
                self.shared.metrics.record_failed();
                self.report(&task, self.courier.completions().reject(&task.token, e));
                return DispatchState::Completed;
            }
        };

        let input = match self.courier.converter().from_payload(&task.input) {
            Ok(input) => input,
            Err(e) => {
                let error = CourierError::from(e).to_activity_error();
                self.shared.metrics.record_failed();
                self.report(&task, self.courier.completions().fail(&task.token, error));
                return DispatchState::Completed;
            }
        };

        match handler {
            Handler::Activity(activity) => self.execute_activity(activity, task, input).await,
            Handler::Workflow(workflow) => self.start_workflow(workflow, task, input),
        }
    }

    async fn execute_activity(
        &self,
        activity: Arc<RegisteredActivity>,
        task: Task,
        input: Value,
    ) -> DispatchState {
        let ctx = Arc::new(ActivityContextImpl::from_task(
            &task,
            self.courier.completion_client(),
        ));
        let metrics = &self.shared.metrics;
        metrics.record_started();
        let started = Instant::now();

        // Run on its own task so a panicking handler cannot take the loop down
        let handle = {
            let ctx: Arc<dyn ActivityContext> = ctx.clone();
            tokio::spawn(async move { activity.execute(ctx, input).await })
        };
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(crate::workflow::future::join_error(&task.name, e)),
        };
        metrics.record_finished(started.elapsed());

        match outcome {
            Ok(_) if ctx.is_do_not_complete_on_return() => {
                debug!(
                    queue = %task.queue,
                    task_id = %task.id,
                    activity = %task.name,
                    token = %task.token,
                    "Activity deferred completion"
                );
                metrics.record_deferred();
                DispatchState::Deferred
            }
            Ok(output) => {
                let resolution = deliver_output(&self.courier, &task, metrics, &output);
                debug!(queue = %task.queue, task_id = %task.id, activity = %task.name, "Activity completed");
                self.report(&task, resolution);
                DispatchState::Completed
            }
            Err(e) => {
                warn!(
                    queue = %task.queue,
                    task_id = %task.id,
                    activity = %task.name,
                    error = %e,
                    "Activity failed"
                );
                metrics.record_failed();
                let resolution = self
                    .courier
                    .completions()
                    .fail(&task.token, e.to_activity_error());
                self.report(&task, resolution);
                DispatchState::Completed
            }
        }
    }

    /// Hand the workflow to its own task; its result arrives through the token
    fn start_workflow(
        &self,
        workflow: Arc<RegisteredWorkflow>,
        task: Task,
        input: Value,
    ) -> DispatchState {
        let workflow_id = task
            .workflow_id
            .clone()
            .unwrap_or_else(|| task.id.to_string());
        let ctx = WorkflowContext::new(
            workflow_id.clone(),
            task.queue.clone(),
            self.courier.activity_proxy(),
        );

        let body = FanOutFuture::spawn(workflow_id.clone(), async move {
            workflow.execute(ctx, input).await
        });
        let abort = body.abort_handle();

        let courier = self.courier.clone();
        let shared = Arc::clone(&self.shared);
        shared.metrics.record_workflow_started();
        shared.metrics.record_started();
        let started = Instant::now();

        let resolver = tokio::spawn(async move {
            let result = body.await;
            shared.metrics.record_finished(started.elapsed());
            let resolution = match result {
                Ok(output) => {
                    debug!(workflow_id = %workflow_id, workflow = %task.name, "Workflow completed");
                    deliver_output(&courier, &task, &shared.metrics, &output)
                }
                Err(e) => {
                    warn!(workflow_id = %workflow_id, workflow = %task.name, error = %e, "Workflow failed");
                    shared.metrics.record_failed();
                    courier
                        .completions()
                        .fail(&task.token, e.to_activity_error())
                }
            };
            if let Err(e) = resolution {
                debug!(workflow_id = %workflow_id, error = %e, "Workflow result not delivered");
            }
        });

        self.shared.track_workflow(RunningWorkflow {
            resolver,
            body: abort,
        });
        DispatchState::Deferred
    }

    fn report(&self, task: &Task, resolution: crate::error::Result<()>) {
        if let Err(e) = resolution {
            // The invocation was already resolved, cancelled and purged
            debug!(task_id = %task.id, token = %task.token, error = %e, "Result not delivered");
        }
    }
}

/// Resolve a successful output; one the converter cannot encode fails the invocation
fn deliver_output(
    courier: &Courier,
    task: &Task,
    metrics: &MetricsRecorder,
    output: &Value,
) -> crate::error::Result<()> {
    match courier.converter().to_payload(output) {
        Ok(payload) => {
            metrics.record_completed();
            courier.completions().complete(&task.token, payload)
        }
        Err(e) => {
            let error = CourierError::from(e);
            warn!(
                queue = %task.queue,
                task_id = %task.id,
                name = %task.name,
                error = %error,
                "Output could not be encoded"
            );
            metrics.record_failed();
            courier.completions().fail(&task.token, error.to_activity_error())
        }
    }
}
