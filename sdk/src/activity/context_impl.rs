//! ActivityContextImpl - Concrete implementation of ActivityContext

use crate::activity::context::ActivityContext;
use crate::completion::ActivityCompletionClient;
use courier_core::{CompletionToken, Task};
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Concrete implementation of ActivityContext, built by the dispatch loop
pub struct ActivityContextImpl {
    task_id: Uuid,
    token: CompletionToken,
    activity_name: String,
    task_queue: String,
    workflow_id: Option<String>,
    deferred: AtomicBool,
    completion: ActivityCompletionClient,
}

impl ActivityContextImpl {
    /// Create the context for executing `task`
    pub fn from_task(task: &Task, completion: ActivityCompletionClient) -> Self {
        Self {
            task_id: task.id,
            token: task.token,
            activity_name: task.name.clone(),
            task_queue: task.queue.clone(),
            workflow_id: task.workflow_id.clone(),
            deferred: AtomicBool::new(false),
            completion,
        }
    }

    /// Context backed by its own completion registry
    #[cfg(test)]
    pub(crate) fn detached(name: &str) -> Self {
        use crate::completion::CompletionRegistry;
        use courier_core::{JsonDataConverter, Payload};
        use std::sync::Arc;

        let task = Task::activity("test", name, Payload::default(), CompletionToken::generate());
        let completion = ActivityCompletionClient::new(
            Arc::new(CompletionRegistry::default()),
            Arc::new(JsonDataConverter),
        );
        Self::from_task(&task, completion)
    }
}

impl ActivityContext for ActivityContextImpl {
    fn task_id(&self) -> Uuid {
        self.task_id
    }

    fn task_token(&self) -> CompletionToken {
        self.token
    }

    fn activity_name(&self) -> &str {
        &self.activity_name
    }

    fn task_queue(&self) -> &str {
        &self.task_queue
    }

    fn workflow_id(&self) -> Option<&str> {
        self.workflow_id.as_deref()
    }

    fn do_not_complete_on_return(&self) {
        self.deferred.store(true, Ordering::SeqCst);
    }

    fn is_do_not_complete_on_return(&self) -> bool {
        self.deferred.load(Ordering::SeqCst)
    }

    fn completion_client(&self) -> ActivityCompletionClient {
        self.completion.clone()
    }
}

impl std::fmt::Debug for ActivityContextImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityContextImpl")
            .field("task_id", &self.task_id)
            .field("activity_name", &self.activity_name)
            .field("task_queue", &self.task_queue)
            .field("deferred", &self.is_do_not_complete_on_return())
            .finish()
    }
}
