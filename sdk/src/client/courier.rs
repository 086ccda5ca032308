//! Courier - the engine tying queues, handlers and completion tokens together

use crate::client::builder::CourierBuilder;
use crate::client::workflow_client::WorkflowClient;
use crate::completion::{ActivityCompletionClient, CompletionRegistry};
use crate::config::ClientConfig;
use crate::proxy::ActivityProxy;
use crate::queue::TaskQueues;
use crate::registry::TaskQueueRegistry;
use crate::worker::{Worker, WorkerFactory};
use courier_core::{DataConverter, JsonDataConverter};
use std::sync::Arc;

/// One in-process dispatch engine.
///
/// Cheap to clone; every clone shares the same queues, handler registry
/// and completion tokens.
#[derive(Clone)]
pub struct Courier {
    inner: Arc<CourierInner>,
}

struct CourierInner {
    config: ClientConfig,
    queues: Arc<TaskQueues>,
    registry: Arc<TaskQueueRegistry>,
    completions: Arc<CompletionRegistry>,
    converter: Arc<dyn DataConverter>,
}

impl Courier {
    /// Engine with the default configuration and JSON payloads
    pub fn new() -> Self {
        Self::from_parts(ClientConfig::default(), Arc::new(JsonDataConverter))
    }

    /// Create a builder
    pub fn builder() -> CourierBuilder {
        CourierBuilder::new()
    }

    pub(crate) fn from_parts(config: ClientConfig, converter: Arc<dyn DataConverter>) -> Self {
        let completions = Arc::new(CompletionRegistry::new(config.completion.clone()));
        Self {
            inner: Arc::new(CourierInner {
                config,
                queues: Arc::new(TaskQueues::new()),
                registry: Arc::new(TaskQueueRegistry::new()),
                completions,
                converter,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Handlers registered per queue
    pub fn registry(&self) -> &Arc<TaskQueueRegistry> {
        &self.inner.registry
    }

    pub fn queues(&self) -> &Arc<TaskQueues> {
        &self.inner.queues
    }

    /// Outstanding completion tokens
    pub fn completions(&self) -> &Arc<CompletionRegistry> {
        &self.inner.completions
    }

    pub fn converter(&self) -> &Arc<dyn DataConverter> {
        &self.inner.converter
    }

    /// Proxy for invoking activities outside a workflow
    pub fn activity_proxy(&self) -> ActivityProxy {
        ActivityProxy::new(
            Arc::clone(&self.inner.queues),
            Arc::clone(&self.inner.completions),
            Arc::clone(&self.inner.converter),
            self.inner.config.default_activity_timeout,
        )
    }

    /// Client for completing deferred activities by token
    pub fn completion_client(&self) -> ActivityCompletionClient {
        ActivityCompletionClient::new(
            Arc::clone(&self.inner.completions),
            Arc::clone(&self.inner.converter),
        )
    }

    /// Client for starting workflows
    pub fn workflow_client(&self) -> WorkflowClient {
        WorkflowClient::new(self.clone())
    }

    /// Factory owning a set of workers
    pub fn worker_factory(&self) -> WorkerFactory {
        WorkerFactory::new(self.clone())
    }

    /// A standalone worker for `task_queue`
    pub fn new_worker(&self, task_queue: &str) -> Worker {
        Worker::new(self.clone(), task_queue, self.inner.config.worker.clone())
    }
}

impl Default for Courier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Courier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Courier")
            .field("config", &self.inner.config)
            .field("encoding", &self.inner.converter.encoding())
            .field("queues", &self.inner.registry.queues())
            .finish()
    }
}
