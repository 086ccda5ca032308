//! Core error types for the Courier dispatch engine
//!
//! These errors are shared by every runtime built on top of the core types.
//! The SDK wraps them in its own error enum.

/// Core error type for payload conversion and token handling
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A completion token could not be parsed or is not known
    #[error("Invalid completion token: {0}")]
    InvalidToken(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
