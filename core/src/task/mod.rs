//! Tasks - the unit of dispatchable work placed on a queue

pub mod execution;
pub mod token;

pub use execution::{ActivityError, TaskExecutionResult};
pub use token::{shard_index, CompletionToken};

use crate::payload::Payload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What a task asks the worker to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    Activity,
    Workflow,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Activity => write!(f, "activity"),
            TaskKind::Workflow => write!(f, "workflow"),
        }
    }
}

/// One unit of dispatchable work.
///
/// A task is created by the invoking side and consumed exactly once by a
/// worker polling `queue`. The `token` identifies the pending invocation that
/// the result must be delivered to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task id
    pub id: Uuid,
    /// Activity or workflow
    pub kind: TaskKind,
    /// Queue the task was emitted on
    pub queue: String,
    /// Registered handler name
    pub name: String,
    /// Serialized arguments
    pub input: Payload,
    /// Token of the pending invocation waiting for this task's result
    pub token: CompletionToken,
    /// Workflow id, for workflow tasks
    pub workflow_id: Option<String>,
    /// When the task was emitted
    pub scheduled_at: DateTime<Utc>,
}

impl Task {
    /// Create an activity task
    pub fn activity(
        queue: impl Into<String>,
        name: impl Into<String>,
        input: Payload,
        token: CompletionToken,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TaskKind::Activity,
            queue: queue.into(),
            name: name.into(),
            input,
            token,
            workflow_id: None,
            scheduled_at: Utc::now(),
        }
    }

    /// Create a workflow task
    pub fn workflow(
        queue: impl Into<String>,
        name: impl Into<String>,
        workflow_id: impl Into<String>,
        input: Payload,
        token: CompletionToken,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TaskKind::Workflow,
            queue: queue.into(),
            name: name.into(),
            input,
            token,
            workflow_id: Some(workflow_id.into()),
            scheduled_at: Utc::now(),
        }
    }
}
