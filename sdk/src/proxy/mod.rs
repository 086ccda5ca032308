//! Activity invocation proxy
//!
//! An invocation serializes its arguments, emits one task carrying a fresh
//! completion token and suspends until the token is resolved or the timeout
//! elapses. There are no retries.

use crate::completion::CompletionRegistry;
use crate::error::{CourierError, Result};
use crate::queue::TaskQueues;
use courier_core::{DataConverter, Task};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Options for invoking an activity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityOptions {
    /// Queue to emit the task on (defaults to the caller's queue)
    pub task_queue: Option<String>,
    /// Maximum time from emitting the task to receiving the result
    pub schedule_to_close_timeout: Option<Duration>,
}

impl ActivityOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the task queue
    pub fn with_task_queue(mut self, queue: impl Into<String>) -> Self {
        self.task_queue = Some(queue.into());
        self
    }

    /// Set the schedule-to-close timeout
    pub fn with_schedule_to_close_timeout(mut self, timeout: Duration) -> Self {
        self.schedule_to_close_timeout = Some(timeout);
        self
    }
}

/// Emits activity tasks and waits for their results
#[derive(Clone)]
pub struct ActivityProxy {
    queues: Arc<TaskQueues>,
    completions: Arc<CompletionRegistry>,
    converter: Arc<dyn DataConverter>,
    default_timeout: Duration,
    default_queue: Option<String>,
    workflow_id: Option<String>,
}

impl ActivityProxy {
    pub fn new(
        queues: Arc<TaskQueues>,
        completions: Arc<CompletionRegistry>,
        converter: Arc<dyn DataConverter>,
        default_timeout: Duration,
    ) -> Self {
        Self {
            queues,
            completions,
            converter,
            default_timeout,
            default_queue: None,
            workflow_id: None,
        }
    }

    /// Bind the proxy to a calling workflow: its queue becomes the default
    pub fn for_workflow(mut self, workflow_id: impl Into<String>, queue: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self.default_queue = Some(queue.into());
        self
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Invoke `activity` on `queue` and wait up to `timeout` for the result
    pub async fn invoke(
        &self,
        queue: &str,
        activity: &str,
        args: Value,
        timeout: Duration,
    ) -> Result<Value> {
        if timeout.is_zero() {
            return Err(CourierError::InvalidConfiguration(format!(
                "timeout for activity {} must be positive",
                activity
            )));
        }

        let input = self.converter.to_payload(&args)?;
        let pending = self.completions.issue(activity);
        let mut task = Task::activity(queue, activity, input, pending.token());
        task.workflow_id = self.workflow_id.clone();

        debug!(
            queue = %queue,
            activity = %activity,
            task_id = %task.id,
            token = %task.token,
            "Invoking activity"
        );
        self.queues.send(task)?;

        match pending.wait(timeout).await {
            Some(Ok(payload)) => Ok(self.converter.from_payload(&payload)?),
            Some(Err(e)) => {
                debug!(queue = %queue, activity = %activity, error = %e, "Activity invocation failed");
                Err(e)
            }
            None => {
                warn!(queue = %queue, activity = %activity, timeout = ?timeout, "Activity timed out");
                Err(CourierError::ActivityTimeout {
                    activity: activity.to_string(),
                    timeout,
                })
            }
        }
    }

    /// Invoke with serde-typed input and output
    pub async fn invoke_typed<I, O>(
        &self,
        queue: &str,
        activity: &str,
        input: &I,
        timeout: Duration,
    ) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let args = serde_json::to_value(input)?;
        let output = self.invoke(queue, activity, args, timeout).await?;
        Ok(serde_json::from_value(output)?)
    }

    /// Invoke using options, falling back to the proxy defaults
    pub async fn execute(&self, activity: &str, args: Value, options: &ActivityOptions) -> Result<Value> {
        let queue = options
            .task_queue
            .as_deref()
            .or(self.default_queue.as_deref())
            .ok_or_else(|| {
                CourierError::InvalidConfiguration(format!(
                    "no task queue for activity {}",
                    activity
                ))
            })?;
        let timeout = options
            .schedule_to_close_timeout
            .unwrap_or(self.default_timeout);
        self.invoke(queue, activity, args, timeout).await
    }

    /// A stub calling `prefix + method` with fixed options
    pub fn stub(&self, prefix: impl Into<String>, options: ActivityOptions) -> ActivityStub {
        ActivityStub {
            proxy: self.clone(),
            prefix: prefix.into(),
            options,
        }
    }
}

impl std::fmt::Debug for ActivityProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityProxy")
            .field("default_timeout", &self.default_timeout)
            .field("default_queue", &self.default_queue)
            .field("workflow_id", &self.workflow_id)
            .finish()
    }
}

/// Options-bound view of the proxy for one activity implementation.
///
/// `call("compose", args)` on a stub with prefix `Hello_` invokes `Hello_compose`.
#[derive(Debug, Clone)]
pub struct ActivityStub {
    proxy: ActivityProxy,
    prefix: String,
    options: ActivityOptions,
}

impl ActivityStub {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn options(&self) -> &ActivityOptions {
        &self.options
    }

    /// Full activity name for a method
    pub fn activity_name(&self, method: &str) -> String {
        format!("{}{}", self.prefix, method)
    }

    /// Invoke a method with JSON arguments
    pub async fn call(&self, method: &str, args: Value) -> Result<Value> {
        self.proxy
            .execute(&self.activity_name(method), args, &self.options)
            .await
    }

    /// Invoke a method with serde-typed input and output
    pub async fn call_typed<I, O>(&self, method: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let output = self.call(method, serde_json::to_value(input)?).await?;
        Ok(serde_json::from_value(output)?)
    }
}
