//! Worker bound to one task queue, and the handle controlling it

use crate::activity::{ActivityContext, ActivityDefinition};
use crate::client::Courier;
use crate::config::WorkerConfig;
use crate::error::Result;
use crate::worker::dispatch::{DispatchLoop, WorkerShared};
use crate::workflow::{WorkflowContext, WorkflowDefinition};
use courier_core::{DispatchState, StopReason, WorkerMetrics, WorkerStatus};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A worker polls one task queue and executes the handlers registered on it.
///
/// # Example
///
/// ```ignore
/// let worker = courier.new_worker("greetings");
/// worker.register_activity(ComposeGreeting);
/// worker.register_workflow(GreetingWorkflow);
/// let handle = worker.start();
/// // ...
/// handle.shutdown().await;
/// ```
#[derive(Clone)]
pub struct Worker {
    courier: Courier,
    task_queue: String,
    config: WorkerConfig,
}

impl Worker {
    pub(crate) fn new(courier: Courier, task_queue: impl Into<String>, config: WorkerConfig) -> Self {
        Self {
            courier,
            task_queue: task_queue.into(),
            config,
        }
    }

    pub fn task_queue(&self) -> &str {
        &self.task_queue
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Register an activity on this worker's queue
    pub fn register_activity<A>(&self, activity: A)
    where
        A: ActivityDefinition + 'static,
    {
        self.courier
            .registry()
            .register_activity(&self.task_queue, activity);
    }

    /// Register an activity on this worker's queue as `prefix + name`
    pub fn register_activity_with_prefix<A>(&self, prefix: &str, activity: A)
    where
        A: ActivityDefinition + 'static,
    {
        self.courier
            .registry()
            .register_activity_with_prefix(&self.task_queue, prefix, activity);
    }

    /// Register a closure as an activity on this worker's queue
    pub fn register_activity_fn<F, Fut>(&self, name: &str, execute_fn: F)
    where
        F: Fn(Arc<dyn ActivityContext>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.courier
            .registry()
            .register_activity_fn(&self.task_queue, name, execute_fn);
    }

    /// Register a workflow on this worker's queue
    pub fn register_workflow<W>(&self, workflow: W)
    where
        W: WorkflowDefinition + 'static,
    {
        self.courier
            .registry()
            .register_workflow(&self.task_queue, workflow);
    }

    /// Register a closure as a workflow on this worker's queue
    pub fn register_workflow_fn<F, Fut>(&self, name: &str, execute_fn: F)
    where
        F: Fn(WorkflowContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.courier
            .registry()
            .register_workflow_fn(&self.task_queue, name, execute_fn);
    }

    /// Start the dispatch loops.
    ///
    /// The loops run until [`WorkerHandle::shutdown`] or until the handle is dropped.
    #[must_use = "dropping the handle stops the worker"]
    pub fn start(&self) -> WorkerHandle {
        let loops = self.config.max_concurrent_activities.max(1);
        let shared = Arc::new(WorkerShared::new(loops));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let queue = self.courier.queues().get_or_create(&self.task_queue);

        let handles = (0..loops)
            .map(|id| {
                let dispatch = DispatchLoop {
                    id,
                    queue: queue.clone(),
                    courier: self.courier.clone(),
                    shared: Arc::clone(&shared),
                    poll_timeout: self.config.poll_timeout,
                    shutdown: shutdown_rx.clone(),
                };
                tokio::spawn(dispatch.run())
            })
            .collect();

        shared.metrics.mark_started();
        *shared.status.write() = WorkerStatus::Running {
            started_at: SystemTime::now(),
            loops,
        };

        info!(
            queue = %self.task_queue,
            loops = loops,
            activities = ?self.courier.registry().activity_names(&self.task_queue),
            workflows = ?self.courier.registry().workflow_names(&self.task_queue),
            "Worker started"
        );

        WorkerHandle {
            task_queue: self.task_queue.clone(),
            config: self.config.clone(),
            shared,
            shutdown_tx,
            loops: handles,
        }
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("task_queue", &self.task_queue)
            .field("config", &self.config)
            .finish()
    }
}

/// Handle to a running worker
pub struct WorkerHandle {
    task_queue: String,
    config: WorkerConfig,
    shared: Arc<WorkerShared>,
    shutdown_tx: watch::Sender<bool>,
    loops: Vec<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn task_queue(&self) -> &str {
        &self.task_queue
    }

    pub fn status(&self) -> WorkerStatus {
        self.shared.status.read().clone()
    }

    pub fn is_running(&self) -> bool {
        self.shared.status.read().is_running()
    }

    pub fn metrics(&self) -> WorkerMetrics {
        self.shared.metrics.snapshot()
    }

    /// Current state of each dispatch loop
    pub fn dispatch_states(&self) -> Vec<DispatchState> {
        self.shared.states.lock().clone()
    }

    /// Stop polling and drain in-flight work.
    ///
    /// Executing activities always finish. Running workflows get the
    /// configured grace period and are aborted after it.
    pub async fn shutdown(self) -> StopReason {
        info!(queue = %self.task_queue, "Worker shutting down");
        *self.shared.status.write() = WorkerStatus::ShuttingDown {
            requested_at: SystemTime::now(),
        };
        let _ = self.shutdown_tx.send(true);

        for handle in self.loops {
            if let Err(e) = handle.await {
                warn!(queue = %self.task_queue, error = %e, "Dispatch loop ended abnormally");
            }
        }

        let workflows = std::mem::take(&mut *self.shared.workflows.lock());
        let (bodies, mut resolvers): (Vec<_>, Vec<_>) = workflows
            .into_iter()
            .map(|w| (w.body, w.resolver))
            .unzip();

        let drained = tokio::time::timeout(self.config.shutdown_grace, async {
            for resolver in resolvers.iter_mut() {
                let _ = resolver.await;
            }
        })
        .await
        .is_ok();

        let reason = if drained {
            StopReason::Graceful
        } else {
            warn!(
                queue = %self.task_queue,
                grace = ?self.config.shutdown_grace,
                "Shutdown grace expired, aborting running workflows"
            );
            for body in &bodies {
                body.abort();
            }
            for resolver in resolvers.into_iter().filter(|r| !r.is_finished()) {
                let _ = resolver.await;
            }
            StopReason::GraceExpired
        };

        *self.shared.status.write() = WorkerStatus::Stopped {
            stopped_at: SystemTime::now(),
            reason: reason.clone(),
        };
        debug!(queue = %self.task_queue, reason = ?reason, "Worker stopped");
        reason
    }
}

impl std::fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("task_queue", &self.task_queue)
            .field("status", &self.status())
            .finish()
    }
}
