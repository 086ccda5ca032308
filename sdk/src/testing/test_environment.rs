//! In-process environment for exercising activities and workflows end to end.

use crate::client::{Courier, WorkflowOptions};
use crate::config::{ClientConfig, WorkerConfig};
use crate::error::Result;
use crate::worker::{Worker, WorkerFactory};
use serde_json::Value;
use std::time::Duration;

/// An engine plus workers tuned for tests.
///
/// Workers poll with a short timeout so shutdown is quick.
///
/// # Example
///
/// ```ignore
/// use courier_sdk::testing::TestEnvironment;
///
/// let env = TestEnvironment::new();
/// env.worker("greetings").register_activity(ComposeGreeting);
/// env.start();
///
/// let out = env.invoke_activity("greetings", "compose", json!("World")).await?;
/// env.shutdown().await;
/// ```
pub struct TestEnvironment {
    courier: Courier,
    factory: WorkerFactory,
    timeout: Duration,
}

impl TestEnvironment {
    /// Default invocation timeout used by the helpers
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a new test environment.
    pub fn new() -> Self {
        let config = ClientConfig::default().with_worker_config(WorkerConfig {
            max_concurrent_activities: 4,
            poll_timeout: Duration::from_millis(20),
            shutdown_grace: Duration::from_secs(1),
        });
        Self::with_config(config)
    }

    /// Create an environment on top of an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        let courier = Courier::from_parts(config, std::sync::Arc::new(courier_core::JsonDataConverter));
        let factory = courier.worker_factory();
        Self {
            courier,
            factory,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Override the timeout used by the invoke and execute helpers.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The underlying engine.
    pub fn courier(&self) -> &Courier {
        &self.courier
    }

    /// A worker for `task_queue`, started by the next [`start`](Self::start).
    pub fn worker(&self, task_queue: &str) -> Worker {
        self.factory.new_worker(task_queue)
    }

    /// Start every worker created since the last call.
    pub fn start(&self) {
        self.factory.start();
    }

    /// Invoke an activity and wait for its result.
    pub async fn invoke_activity(&self, task_queue: &str, activity: &str, input: Value) -> Result<Value> {
        self.courier
            .activity_proxy()
            .invoke(task_queue, activity, input, self.timeout)
            .await
    }

    /// Run a workflow to completion.
    pub async fn execute_workflow(&self, task_queue: &str, workflow: &str, input: Value) -> Result<Value> {
        self.courier
            .workflow_client()
            .execute_workflow(
                workflow,
                input,
                WorkflowOptions::new(task_queue).with_execution_timeout(self.timeout),
            )
            .await
    }

    /// Stop all started workers.
    pub async fn shutdown(&self) {
        self.factory.shutdown().await;
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TestEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestEnvironment")
            .field("courier", &self.courier)
            .field("timeout", &self.timeout)
            .finish()
    }
}
