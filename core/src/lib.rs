//! # Courier Core
//!
//! Runtime-agnostic building blocks for the Courier task dispatch engine.
//!
//! ## What's in Core vs SDK
//!
//! **Core** contains plain data and pure logic:
//! - Tasks, task kinds and completion tokens
//! - Execution outcomes and the handler failure payload
//! - Opaque payloads and the pluggable data converter
//! - Worker lifecycle status, dispatch states and metrics
//!
//! **SDK** contains everything that needs an async runtime:
//! - Handler registration and lookup
//! - The activity invocation proxy and the completion token registry
//! - Worker dispatch loops and the fan-out coordinator
//! - Workflow client, configuration and testing utilities
//!
//! ## Modules
//!
//! - [`task`] - Task, CompletionToken, TaskExecutionResult, ActivityError
//! - [`payload`] - Payload and DataConverter
//! - [`worker`] - Lifecycle status and metrics
//! - [`error`] - Core error types

pub mod error;
pub mod payload;
pub mod task;
pub mod worker;

// Re-export error types
pub use error::{CoreError, CoreResult};

// Re-export payload types
pub use payload::{DataConverter, JsonDataConverter, Payload};

// Re-export task types
pub use task::{ActivityError, CompletionToken, Task, TaskExecutionResult, TaskKind};

// Re-export worker types
pub use worker::{DispatchState, StopReason, WorkerMetrics, WorkerStatus};
