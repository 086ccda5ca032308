//! WorkflowContext - what a running workflow uses to reach activities

use crate::error::Result;
use crate::proxy::{ActivityOptions, ActivityProxy, ActivityStub};
use crate::workflow::future::FanOutFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Context handed to a workflow execution.
///
/// Cheap to clone; clone it into spawned units that call activities.
#[derive(Clone)]
pub struct WorkflowContext {
    inner: Arc<WorkflowContextInner>,
}

struct WorkflowContextInner {
    workflow_id: String,
    task_queue: String,
    proxy: ActivityProxy,
}

impl WorkflowContext {
    pub fn new(
        workflow_id: impl Into<String>,
        task_queue: impl Into<String>,
        proxy: ActivityProxy,
    ) -> Self {
        let workflow_id = workflow_id.into();
        let task_queue = task_queue.into();
        let proxy = proxy.for_workflow(workflow_id.clone(), task_queue.clone());
        Self {
            inner: Arc::new(WorkflowContextInner {
                workflow_id,
                task_queue,
                proxy,
            }),
        }
    }

    pub fn workflow_id(&self) -> &str {
        &self.inner.workflow_id
    }

    /// Queue the workflow was started on; the default for its activities
    pub fn task_queue(&self) -> &str {
        &self.inner.task_queue
    }

    pub fn proxy(&self) -> &ActivityProxy {
        &self.inner.proxy
    }

    /// Invoke an activity on an explicit queue with an explicit timeout
    pub async fn invoke(
        &self,
        queue: &str,
        activity: &str,
        args: Value,
        timeout: Duration,
    ) -> Result<Value> {
        self.inner.proxy.invoke(queue, activity, args, timeout).await
    }

    /// Invoke an activity on the workflow's queue with the default timeout
    pub async fn execute_activity(&self, activity: &str, args: Value) -> Result<Value> {
        self.inner
            .proxy
            .execute(activity, args, &ActivityOptions::default())
            .await
    }

    /// Invoke an activity with explicit options
    pub async fn execute_activity_with_options(
        &self,
        activity: &str,
        args: Value,
        options: &ActivityOptions,
    ) -> Result<Value> {
        self.inner.proxy.execute(activity, args, options).await
    }

    /// Invoke an activity with serde-typed input and output
    pub async fn execute_activity_typed<I, O>(&self, activity: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let output = self
            .execute_activity(activity, serde_json::to_value(input)?)
            .await?;
        Ok(serde_json::from_value(output)?)
    }

    /// Stub calling `prefix + method` with the given options
    pub fn activity_stub(&self, prefix: impl Into<String>, options: ActivityOptions) -> ActivityStub {
        self.inner.proxy.stub(prefix, options)
    }

    /// Launch a unit of work concurrently with the workflow.
    ///
    /// The returned future resolves to the unit's result; join several with
    /// [`join`](crate::workflow::join) or [`join_all`](crate::workflow::join_all).
    pub fn spawn<F, T>(&self, future: F) -> FanOutFuture<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        FanOutFuture::spawn(self.inner.workflow_id.clone(), future)
    }
}

impl std::fmt::Debug for WorkflowContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowContext")
            .field("workflow_id", &self.inner.workflow_id)
            .field("task_queue", &self.inner.task_queue)
            .finish()
    }
}
