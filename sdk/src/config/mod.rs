//! Configuration presets for Courier
//!
//! Workers, the completion token registry and the client each have a
//! configuration struct with sensible defaults and presets for common cases.

use std::time::Duration;

/// Configuration for a worker bound to one task queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Number of dispatch loops, i.e. activities executing concurrently
    pub max_concurrent_activities: usize,
    /// How long one poll waits before the loop goes back to idle
    pub poll_timeout: Duration,
    /// How long shutdown waits for in-flight workflows
    pub shutdown_grace: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl WorkerConfig {
    /// Default configuration suitable for most use cases
    pub const DEFAULT: Self = Self {
        max_concurrent_activities: 4,
        poll_timeout: Duration::from_secs(1),
        shutdown_grace: Duration::from_secs(10),
    };

    /// High-throughput configuration for heavy activity workloads
    pub const HIGH_THROUGHPUT: Self = Self {
        max_concurrent_activities: 32,
        poll_timeout: Duration::from_millis(500),
        shutdown_grace: Duration::from_secs(30),
    };

    /// Low-resource configuration for constrained environments
    pub const LOW_RESOURCE: Self = Self {
        max_concurrent_activities: 1,
        poll_timeout: Duration::from_secs(5),
        shutdown_grace: Duration::from_secs(5),
    };

    /// Create a new configuration with validation
    pub fn new(
        max_concurrent_activities: usize,
        poll_timeout: Duration,
        shutdown_grace: Duration,
    ) -> Result<Self, ConfigError> {
        if max_concurrent_activities == 0 {
            return Err(ConfigError::InvalidValue(
                "max_concurrent_activities must be positive".to_string(),
            ));
        }
        if poll_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "poll_timeout must be positive".to_string(),
            ));
        }

        Ok(Self {
            max_concurrent_activities,
            poll_timeout,
            shutdown_grace,
        })
    }

    /// Set the number of dispatch loops
    pub fn with_max_concurrent_activities(mut self, n: usize) -> Self {
        self.max_concurrent_activities = n;
        self
    }
}

/// Configuration for the completion token registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    /// How long a cancelled token keeps swallowing late completions
    pub tombstone_retention: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl CompletionConfig {
    pub const DEFAULT: Self = Self {
        tombstone_retention: Duration::from_secs(300),
    };

    pub fn new(tombstone_retention: Duration) -> Result<Self, ConfigError> {
        if tombstone_retention.is_zero() {
            return Err(ConfigError::InvalidValue(
                "tombstone_retention must be positive".to_string(),
            ));
        }
        Ok(Self {
            tombstone_retention,
        })
    }
}

/// Complete configuration for a Courier engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Timeout applied to activity invocations that do not set one
    pub default_activity_timeout: Duration,
    /// Execution timeout applied to workflows that do not set one
    pub default_workflow_timeout: Duration,
    /// Configuration for workers created by the engine
    pub worker: WorkerConfig,
    /// Configuration for the completion token registry
    pub completion: CompletionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_activity_timeout: Duration::from_secs(10),
            default_workflow_timeout: Duration::from_secs(60),
            worker: WorkerConfig::DEFAULT,
            completion: CompletionConfig::DEFAULT,
        }
    }
}

impl ClientConfig {
    /// High-throughput configuration for production workloads
    pub fn high_throughput() -> Self {
        Self {
            worker: WorkerConfig::HIGH_THROUGHPUT,
            ..Self::default()
        }
    }

    /// Low-resource configuration for development or constrained environments
    pub fn low_resource() -> Self {
        Self {
            worker: WorkerConfig::LOW_RESOURCE,
            ..Self::default()
        }
    }

    /// Set the default activity timeout
    pub fn with_default_activity_timeout(mut self, timeout: Duration) -> Self {
        self.default_activity_timeout = timeout;
        self
    }

    /// Set the default workflow execution timeout
    pub fn with_default_workflow_timeout(mut self, timeout: Duration) -> Self {
        self.default_workflow_timeout = timeout;
        self
    }

    /// Set worker configuration
    pub fn with_worker_config(mut self, config: WorkerConfig) -> Self {
        self.worker = config;
        self
    }

    /// Set completion registry configuration
    pub fn with_completion_config(mut self, config: CompletionConfig) -> Self {
        self.completion = config;
        self
    }

    /// Check the timeouts are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_activity_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "default_activity_timeout must be positive".to_string(),
            ));
        }
        if self.default_workflow_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "default_workflow_timeout must be positive".to_string(),
            ));
        }
        WorkerConfig::new(
            self.worker.max_concurrent_activities,
            self.worker.poll_timeout,
            self.worker.shutdown_grace,
        )?;
        CompletionConfig::new(self.completion.tombstone_retention)?;
        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<ConfigError> for crate::error::CourierError {
    fn from(err: ConfigError) -> Self {
        crate::error::CourierError::InvalidConfiguration(err.to_string())
    }
}
