//! Error types for the Courier SDK

use std::time::Duration;

// Re-export core error types
pub use courier_core::{ActivityError, CoreError};

/// Main error type for the Courier SDK
#[derive(Debug, thiserror::Error)]
pub enum CourierError {
    /// No handler registered under this name on the queue
    #[error("Handler not found: {name} on queue {queue}")]
    NotFound { queue: String, name: String },

    /// The activity handler reported an error
    #[error("Activity failed: {activity}: {error}")]
    ActivityFailure {
        activity: String,
        error: ActivityError,
    },

    /// No result arrived within the invocation timeout
    #[error("Activity timed out: {activity} after {timeout:?}")]
    ActivityTimeout { activity: String, timeout: Duration },

    /// The completion token is unknown or was already consumed
    #[error("Invalid completion token: {0}")]
    InvalidToken(String),

    /// A workflow returned an error
    #[error("Workflow failed: {workflow_id}: {error}")]
    WorkflowFailed {
        workflow_id: String,
        error: ActivityError,
    },

    /// No workflow result within the execution timeout
    #[error("Workflow timed out: {workflow_id} after {timeout:?}")]
    WorkflowTimeout {
        workflow_id: String,
        timeout: Duration,
    },

    /// The unit of work was aborted before producing a result
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Application error raised by handler code
    #[error("{0}")]
    Application(ActivityError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Courier SDK operations
pub type Result<T> = std::result::Result<T, CourierError>;

impl From<CoreError> for CourierError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Serialization(e) => CourierError::Serialization(e),
            CoreError::InvalidConfiguration(msg) => CourierError::InvalidConfiguration(msg),
            CoreError::InvalidToken(msg) => CourierError::InvalidToken(msg),
            CoreError::Other(msg) => CourierError::Other(msg),
        }
    }
}

impl From<ActivityError> for CourierError {
    fn from(err: ActivityError) -> Self {
        CourierError::Application(err)
    }
}

impl CourierError {
    /// Shorthand for an application error with a type code
    pub fn application(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        CourierError::Application(ActivityError::new(message).with_type(error_type))
    }

    /// Classify this error into the failure payload reported to the waiting side.
    ///
    /// Failures that already carry a payload pass it through unchanged, so an
    /// activity error surfaces intact through the workflow that called it.
    pub fn to_activity_error(&self) -> ActivityError {
        match self {
            CourierError::ActivityFailure { error, .. }
            | CourierError::WorkflowFailed { error, .. }
            | CourierError::Application(error) => error.clone(),
            CourierError::NotFound { .. } => ActivityError::new(self.to_string()).with_type("NOT_FOUND"),
            CourierError::ActivityTimeout { .. } | CourierError::WorkflowTimeout { .. } => {
                ActivityError::new(self.to_string()).with_type("TIMEOUT")
            }
            CourierError::InvalidToken(_) => {
                ActivityError::new(self.to_string()).with_type("INVALID_TOKEN")
            }
            CourierError::Cancelled(_) => ActivityError::new(self.to_string()).with_type("CANCELLED"),
            CourierError::Serialization(_) => {
                ActivityError::new(self.to_string()).with_type("INVALID_INPUT")
            }
            CourierError::InvalidConfiguration(_) => {
                ActivityError::new(self.to_string()).with_type("INVALID_CONFIGURATION")
            }
            CourierError::Other(msg) => ActivityError::new(msg.clone()),
        }
    }

    /// The handler-reported payload, if this is an activity or workflow failure
    pub fn failure_payload(&self) -> Option<&ActivityError> {
        match self {
            CourierError::ActivityFailure { error, .. }
            | CourierError::WorkflowFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}
