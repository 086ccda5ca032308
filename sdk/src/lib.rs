//! Courier SDK for Rust
//!
//! An in-process activity dispatch engine: handlers are registered on named
//! task queues, workers poll those queues, and callers invoke activities
//! through a proxy that waits on a one-shot completion token. Workflows
//! coordinate activities and can fan out concurrent branches.

#![allow(clippy::result_large_err)]

pub mod activity;
pub mod client;
pub mod completion;
pub mod config;
pub mod error;
pub mod proxy;
pub mod queue;
pub mod registry;
pub mod worker;
pub mod workflow;

/// Testing utilities for activities and workflows.
/// Available only with the `testing` feature enabled.
#[cfg(feature = "testing")]
pub mod testing;

// Re-export commonly used types
pub use error::{CourierError, Result};

// Re-export config types
pub use config::{ClientConfig, CompletionConfig, WorkerConfig};

// Re-export client types
pub use client::{Courier, CourierBuilder, WorkflowClient, WorkflowHandle, WorkflowOptions};

// Re-export activity types
pub use activity::{ActivityContext, ActivityContextImpl, ActivityDefinition};
pub use completion::{ActivityCompletionClient, CompletionRegistry, PendingInvocation};
pub use proxy::{ActivityOptions, ActivityProxy, ActivityStub};
pub use registry::{HandlerMetadata, TaskQueueRegistry};

// Re-export worker types
pub use worker::{Worker, WorkerFactory, WorkerHandle};

// Re-export workflow types
pub use workflow::{join, join2, join_all, spawn, FanOutFuture, WorkflowContext, WorkflowDefinition};

// Re-export core types
pub use courier_core::{
    ActivityError, CompletionToken, DataConverter, DispatchState, JsonDataConverter, Payload,
    StopReason, WorkerMetrics, WorkerStatus,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::activity::{ActivityContext, ActivityDefinition};
    pub use crate::client::{Courier, CourierBuilder, WorkflowHandle, WorkflowOptions};
    pub use crate::completion::ActivityCompletionClient;
    pub use crate::config::{ClientConfig, WorkerConfig};
    pub use crate::error::{CourierError, Result};
    pub use crate::proxy::{ActivityOptions, ActivityStub};
    pub use crate::worker::{Worker, WorkerHandle};
    pub use crate::workflow::{join, join2, join_all, spawn, WorkflowContext, WorkflowDefinition};
    pub use async_trait::async_trait;
    pub use courier_core::{ActivityError, CompletionToken};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{json, Value};
}
