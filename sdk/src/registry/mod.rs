//! TaskQueueRegistry - handlers registered per task queue
//!
//! Activities and workflows are registered under a (queue, name) pair. A later
//! registration under the same pair replaces the earlier one.

use crate::activity::{ActivityContext, ActivityDefinition};
use crate::error::{CourierError, Result};
use crate::workflow::{WorkflowContext, WorkflowDefinition};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

/// Type alias for boxed activity execution functions
pub type BoxedActivityFn = Box<
    dyn Fn(Arc<dyn ActivityContext>, Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>>
        + Send
        + Sync,
>;

/// Type alias for boxed workflow execution functions
pub type BoxedWorkflowFn = Box<
    dyn Fn(WorkflowContext, Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>>
        + Send
        + Sync,
>;

/// Handler metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerMetadata {
    /// Name the handler is dispatched by
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

impl HandlerMetadata {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// A registered activity with its metadata and execution function
pub struct RegisteredActivity {
    pub metadata: HandlerMetadata,
    execute_fn: BoxedActivityFn,
}

impl RegisteredActivity {
    pub fn new(metadata: HandlerMetadata, execute_fn: BoxedActivityFn) -> Self {
        Self {
            metadata,
            execute_fn,
        }
    }

    /// Execute the activity
    pub async fn execute(&self, ctx: Arc<dyn ActivityContext>, input: Value) -> Result<Value> {
        (self.execute_fn)(ctx, input).await
    }
}

impl std::fmt::Debug for RegisteredActivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredActivity")
            .field("metadata", &self.metadata)
            .field("execute_fn", &"<function>")
            .finish()
    }
}

/// A registered workflow with its metadata and execution function
pub struct RegisteredWorkflow {
    pub metadata: HandlerMetadata,
    execute_fn: BoxedWorkflowFn,
}

impl RegisteredWorkflow {
    pub fn new(metadata: HandlerMetadata, execute_fn: BoxedWorkflowFn) -> Self {
        Self {
            metadata,
            execute_fn,
        }
    }

    /// Execute the workflow
    pub async fn execute(&self, ctx: WorkflowContext, input: Value) -> Result<Value> {
        (self.execute_fn)(ctx, input).await
    }
}

impl std::fmt::Debug for RegisteredWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredWorkflow")
            .field("metadata", &self.metadata)
            .field("execute_fn", &"<function>")
            .finish()
    }
}

/// Result of a lookup
#[derive(Debug, Clone)]
pub enum Handler {
    Activity(Arc<RegisteredActivity>),
    Workflow(Arc<RegisteredWorkflow>),
}

impl Handler {
    pub fn name(&self) -> &str {
        match self {
            Handler::Activity(a) => &a.metadata.name,
            Handler::Workflow(w) => &w.metadata.name,
        }
    }
}

#[derive(Default)]
struct QueueHandlers {
    activities: HashMap<String, Arc<RegisteredActivity>>,
    workflows: HashMap<String, Arc<RegisteredWorkflow>>,
}

/// Registry of handlers keyed by task queue and name.
#[derive(Default)]
pub struct TaskQueueRegistry {
    queues: RwLock<HashMap<String, QueueHandlers>>,
}

impl TaskQueueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an activity, replacing any handler of the same name on the queue
    pub fn register_activity_raw(&self, queue: &str, activity: RegisteredActivity) {
        let name = activity.metadata.name.clone();
        let mut queues = self.queues.write();
        let handlers = queues.entry(queue.to_string()).or_default();
        if handlers
            .activities
            .insert(name.clone(), Arc::new(activity))
            .is_some()
        {
            debug!(queue = %queue, activity = %name, "Replaced activity registration");
        }
    }

    /// Register a workflow, replacing any handler of the same name on the queue
    pub fn register_workflow_raw(&self, queue: &str, workflow: RegisteredWorkflow) {
        let name = workflow.metadata.name.clone();
        let mut queues = self.queues.write();
        let handlers = queues.entry(queue.to_string()).or_default();
        if handlers
            .workflows
            .insert(name.clone(), Arc::new(workflow))
            .is_some()
        {
            debug!(queue = %queue, workflow = %name, "Replaced workflow registration");
        }
    }

    /// Register an activity definition under its own name
    ///
    /// # Example
    ///
    /// ```ignore
    /// registry.register_activity("greetings", ComposeGreeting);
    /// ```
    pub fn register_activity<A>(&self, queue: &str, activity: A)
    where
        A: ActivityDefinition + 'static,
    {
        self.register_activity_with_prefix(queue, "", activity)
    }

    /// Register an activity definition as `prefix + name`.
    ///
    /// Lets several implementations of the same activity share a queue.
    pub fn register_activity_with_prefix<A>(&self, queue: &str, prefix: &str, activity: A)
    where
        A: ActivityDefinition + 'static,
    {
        let metadata = HandlerMetadata {
            name: format!("{}{}", prefix, activity.name()),
            description: activity.description().map(|s| s.to_string()),
        };

        let activity = Arc::new(activity);

        let execute_fn: BoxedActivityFn = Box::new(move |ctx, input| {
            let activity = Arc::clone(&activity);
            Box::pin(async move {
                let typed_input: A::Input =
                    serde_json::from_value(input).map_err(CourierError::Serialization)?;
                let output = activity.execute(typed_input, ctx.as_ref()).await?;
                serde_json::to_value(output).map_err(CourierError::Serialization)
            })
        });

        self.register_activity_raw(queue, RegisteredActivity::new(metadata, execute_fn))
    }

    /// Register a closure as an activity
    pub fn register_activity_fn<F, Fut>(&self, queue: &str, name: &str, execute_fn: F)
    where
        F: Fn(Arc<dyn ActivityContext>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let boxed_fn: BoxedActivityFn = Box::new(move |ctx, input| Box::pin(execute_fn(ctx, input)));
        self.register_activity_raw(
            queue,
            RegisteredActivity::new(HandlerMetadata::named(name), boxed_fn),
        )
    }

    /// Register a workflow definition under its own name
    pub fn register_workflow<W>(&self, queue: &str, workflow: W)
    where
        W: WorkflowDefinition + 'static,
    {
        let metadata = HandlerMetadata {
            name: workflow.name().to_string(),
            description: workflow.description().map(|s| s.to_string()),
        };

        let workflow = Arc::new(workflow);

        let execute_fn: BoxedWorkflowFn = Box::new(move |ctx, input| {
            let workflow = Arc::clone(&workflow);
            Box::pin(async move {
                let typed_input: W::Input =
                    serde_json::from_value(input).map_err(CourierError::Serialization)?;
                let output = workflow.execute(&ctx, typed_input).await?;
                serde_json::to_value(output).map_err(CourierError::Serialization)
            })
        });

        self.register_workflow_raw(queue, RegisteredWorkflow::new(metadata, execute_fn))
    }

    /// Register a closure as a workflow
    pub fn register_workflow_fn<F, Fut>(&self, queue: &str, name: &str, execute_fn: F)
    where
        F: Fn(WorkflowContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let boxed_fn: BoxedWorkflowFn = Box::new(move |ctx, input| Box::pin(execute_fn(ctx, input)));
        self.register_workflow_raw(
            queue,
            RegisteredWorkflow::new(HandlerMetadata::named(name), boxed_fn),
        )
    }

    /// Look up any handler by queue and name, activities first
    pub fn lookup(&self, queue: &str, name: &str) -> Result<Handler> {
        let queues = self.queues.read();
        let handlers = queues.get(queue);
        if let Some(activity) = handlers.and_then(|h| h.activities.get(name)) {
            return Ok(Handler::Activity(Arc::clone(activity)));
        }
        if let Some(workflow) = handlers.and_then(|h| h.workflows.get(name)) {
            return Ok(Handler::Workflow(Arc::clone(workflow)));
        }
        Err(not_found(queue, name))
    }

    /// Look up an activity by queue and name
    pub fn lookup_activity(&self, queue: &str, name: &str) -> Result<Arc<RegisteredActivity>> {
        self.queues
            .read()
            .get(queue)
            .and_then(|h| h.activities.get(name))
            .cloned()
            .ok_or_else(|| not_found(queue, name))
    }

    /// Look up a workflow by queue and name
    pub fn lookup_workflow(&self, queue: &str, name: &str) -> Result<Arc<RegisteredWorkflow>> {
        self.queues
            .read()
            .get(queue)
            .and_then(|h| h.workflows.get(name))
            .cloned()
            .ok_or_else(|| not_found(queue, name))
    }

    /// Activity names registered on a queue, sorted
    pub fn activity_names(&self, queue: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .queues
            .read()
            .get(queue)
            .map(|h| h.activities.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Workflow names registered on a queue, sorted
    pub fn workflow_names(&self, queue: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .queues
            .read()
            .get(queue)
            .map(|h| h.workflows.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Queues with at least one registration, sorted
    pub fn queues(&self) -> Vec<String> {
        let mut names: Vec<String> = self.queues.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if any handler is registered on a queue
    pub fn has_registrations(&self, queue: &str) -> bool {
        self.queues
            .read()
            .get(queue)
            .map(|h| !h.activities.is_empty() || !h.workflows.is_empty())
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for TaskQueueRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueueRegistry")
            .field("queues", &self.queues())
            .finish()
    }
}

fn not_found(queue: &str, name: &str) -> CourierError {
    CourierError::NotFound {
        queue: queue.to_string(),
        name: name.to_string(),
    }
}
