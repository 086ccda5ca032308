//! Task execution types - runtime-agnostic outcome and failure payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Failure payload reported by a handler.
///
/// This is what travels back to the invoking side inside an
/// `ActivityFailure`; it is plain data so it can cross process boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityError {
    /// Human-readable error message
    pub message: String,
    /// Machine-readable error type for categorization
    pub error_type: Option<String>,
    /// Optional structured details supplied by the handler
    pub details: Option<Value>,
}

impl ActivityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: None,
            details: None,
        }
    }

    /// Set the error type
    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    /// Attach structured details
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for ActivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_type {
            Some(error_type) => write!(f, "[{}] {}", error_type, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ActivityError {}

/// Result of running one task on a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaskExecutionResult {
    /// Handler returned a value
    Completed { output: Value },
    /// Handler returned an error or panicked
    Failed { error: ActivityError },
    /// Handler asked not to be completed on return; the result arrives later
    /// through the completion token
    Deferred,
}

impl TaskExecutionResult {
    /// Create a successful completion result
    pub fn completed(output: Value) -> Self {
        Self::Completed { output }
    }

    /// Create a failed result
    pub fn failed(error: ActivityError) -> Self {
        Self::Failed { error }
    }

    /// Check if the result is terminal for the invocation right now
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Deferred)
    }

    /// Short label used in logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
            Self::Deferred => "deferred",
        }
    }
}
