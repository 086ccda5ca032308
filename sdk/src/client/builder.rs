//! Courier builder for fluent configuration

use crate::client::courier::Courier;
use crate::config::{ClientConfig, CompletionConfig, WorkerConfig};
use crate::error::Result;
use courier_core::{DataConverter, JsonDataConverter};
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating Courier instances
///
/// Example:
/// ```ignore
/// let courier = Courier::builder()
///     .default_activity_timeout(Duration::from_secs(2))
///     .worker_config(WorkerConfig::LOW_RESOURCE)
///     .build()?;
/// ```
pub struct CourierBuilder {
    config: ClientConfig,
    converter: Arc<dyn DataConverter>,
}

impl Default for CourierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CourierBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            converter: Arc::new(JsonDataConverter),
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the worker configuration
    pub fn worker_config(mut self, config: WorkerConfig) -> Self {
        self.config.worker = config;
        self
    }

    /// Set the completion registry configuration
    pub fn completion_config(mut self, config: CompletionConfig) -> Self {
        self.config.completion = config;
        self
    }

    /// Set the default activity timeout
    pub fn default_activity_timeout(mut self, timeout: Duration) -> Self {
        self.config.default_activity_timeout = timeout;
        self
    }

    /// Set the default workflow execution timeout
    pub fn default_workflow_timeout(mut self, timeout: Duration) -> Self {
        self.config.default_workflow_timeout = timeout;
        self
    }

    /// Set the number of dispatch loops per worker
    pub fn max_concurrent_activities(mut self, max: usize) -> Self {
        self.config.worker.max_concurrent_activities = max;
        self
    }

    /// Use a custom payload converter
    pub fn data_converter(mut self, converter: impl DataConverter + 'static) -> Self {
        self.converter = Arc::new(converter);
        self
    }

    /// Validate the configuration and build the engine
    pub fn build(self) -> Result<Courier> {
        self.config.validate()?;
        Ok(Courier::from_parts(self.config, self.converter))
    }
}
