//! Starting workflows and waiting for their results

use crate::client::courier::Courier;
use crate::completion::PendingInvocation;
use crate::error::{CourierError, Result};
use courier_core::{DataConverter, Task};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Options for starting a workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Workflow id; generated when absent
    pub workflow_id: Option<String>,
    /// Queue the workflow task is emitted on
    pub task_queue: String,
    /// How long [`WorkflowHandle::result`] waits; the engine default when absent
    pub execution_timeout: Option<Duration>,
}

impl WorkflowOptions {
    pub fn new(task_queue: impl Into<String>) -> Self {
        Self {
            workflow_id: None,
            task_queue: task_queue.into(),
            execution_timeout: None,
        }
    }

    /// Set the workflow id
    pub fn with_workflow_id(mut self, id: impl Into<String>) -> Self {
        self.workflow_id = Some(id.into());
        self
    }

    /// Set task queue
    pub fn with_task_queue(mut self, queue: impl Into<String>) -> Self {
        self.task_queue = queue.into();
        self
    }

    /// Set the execution timeout
    pub fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = Some(timeout);
        self
    }
}

/// Client for starting workflows
#[derive(Debug, Clone)]
pub struct WorkflowClient {
    courier: Courier,
}

impl WorkflowClient {
    pub(crate) fn new(courier: Courier) -> Self {
        Self { courier }
    }

    /// Emit a workflow task and return a handle to its result.
    ///
    /// The workflow starts once a worker on `options.task_queue` polls it.
    pub fn start_workflow(
        &self,
        workflow: &str,
        input: Value,
        options: WorkflowOptions,
    ) -> Result<WorkflowHandle> {
        let timeout = options
            .execution_timeout
            .unwrap_or(self.courier.config().default_workflow_timeout);
        if timeout.is_zero() {
            return Err(CourierError::InvalidConfiguration(format!(
                "execution timeout for workflow {} must be positive",
                workflow
            )));
        }

        let workflow_id = options
            .workflow_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let payload = self.courier.converter().to_payload(&input)?;
        let pending = self.courier.completions().issue(workflow);
        let task = Task::workflow(
            &options.task_queue,
            workflow,
            &workflow_id,
            payload,
            pending.token(),
        );

        debug!(
            queue = %options.task_queue,
            workflow = %workflow,
            workflow_id = %workflow_id,
            token = %task.token,
            "Starting workflow"
        );
        self.courier.queues().send(task)?;

        Ok(WorkflowHandle {
            workflow_id,
            pending,
            converter: Arc::clone(self.courier.converter()),
            timeout,
        })
    }

    /// Start a workflow with serde-typed input
    pub fn start_workflow_typed<I>(
        &self,
        workflow: &str,
        input: &I,
        options: WorkflowOptions,
    ) -> Result<WorkflowHandle>
    where
        I: Serialize + ?Sized,
    {
        self.start_workflow(workflow, serde_json::to_value(input)?, options)
    }

    /// Start a workflow and wait for its result
    pub async fn execute_workflow(
        &self,
        workflow: &str,
        input: Value,
        options: WorkflowOptions,
    ) -> Result<Value> {
        self.start_workflow(workflow, input, options)?.result().await
    }

    /// Start a workflow and wait at most `timeout` for its result
    pub async fn start_workflow_and_wait(
        &self,
        workflow: &str,
        input: Value,
        options: WorkflowOptions,
        timeout: Duration,
    ) -> Result<Value> {
        self.execute_workflow(workflow, input, options.with_execution_timeout(timeout))
            .await
    }

    /// Start a workflow with typed input and output and wait for its result
    pub async fn execute_workflow_typed<I, O>(
        &self,
        workflow: &str,
        input: &I,
        options: WorkflowOptions,
    ) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.start_workflow_typed(workflow, input, options)?
            .result_typed()
            .await
    }
}

/// Handle to a started workflow.
///
/// Dropping the handle abandons the result; the workflow keeps running.
pub struct WorkflowHandle {
    workflow_id: String,
    pending: PendingInvocation,
    converter: Arc<dyn DataConverter>,
    timeout: Duration,
}

impl WorkflowHandle {
    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub fn workflow_name(&self) -> &str {
        self.pending.name()
    }

    /// Wait for the workflow to finish
    pub async fn result(self) -> Result<Value> {
        let Self {
            workflow_id,
            pending,
            converter,
            timeout,
        } = self;

        match pending.wait(timeout).await {
            Some(Ok(payload)) => Ok(converter.from_payload(&payload)?),
            Some(Err(CourierError::ActivityFailure { error, .. })) => {
                Err(CourierError::WorkflowFailed { workflow_id, error })
            }
            Some(Err(e)) => Err(e),
            None => {
                warn!(workflow_id = %workflow_id, timeout = ?timeout, "Workflow timed out");
                Err(CourierError::WorkflowTimeout {
                    workflow_id,
                    timeout,
                })
            }
        }
    }

    /// Wait for the workflow and deserialize its output
    pub async fn result_typed<O>(self) -> Result<O>
    where
        O: DeserializeOwned,
    {
        Ok(serde_json::from_value(self.result().await?)?)
    }
}

impl std::fmt::Debug for WorkflowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowHandle")
            .field("workflow_id", &self.workflow_id)
            .field("workflow", &self.pending.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
