//! ActivityCompletionClient - out-of-band completion of deferred activities

use crate::completion::registry::CompletionRegistry;
use crate::error::Result;
use courier_core::{ActivityError, CompletionToken, DataConverter};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Completes or fails activities by token.
///
/// Handed to activity code that returned with completion deferred; any task
/// holding the token can finish the invocation later.
///
/// # Example
///
/// ```ignore
/// let token = ctx.task_token();
/// let client = ctx.completion_client();
/// ctx.do_not_complete_on_return();
/// tokio::spawn(async move {
///     client.complete(&token, &"Hello World!").ok();
/// });
/// ```
#[derive(Clone)]
pub struct ActivityCompletionClient {
    registry: Arc<CompletionRegistry>,
    converter: Arc<dyn DataConverter>,
}

impl ActivityCompletionClient {
    pub fn new(registry: Arc<CompletionRegistry>, converter: Arc<dyn DataConverter>) -> Self {
        Self {
            registry,
            converter,
        }
    }

    /// Complete with a serializable result
    pub fn complete<T: Serialize>(&self, token: &CompletionToken, result: &T) -> Result<()> {
        self.complete_raw(token, serde_json::to_value(result)?)
    }

    /// Complete with a JSON value
    pub fn complete_raw(&self, token: &CompletionToken, result: Value) -> Result<()> {
        let payload = self.converter.to_payload(&result)?;
        debug!(token = %token, "Completing activity by token");
        self.registry.complete(token, payload)
    }

    /// Fail with a handler error payload
    pub fn fail(&self, token: &CompletionToken, error: ActivityError) -> Result<()> {
        debug!(token = %token, error = %error, "Failing activity by token");
        self.registry.fail(token, error)
    }

    /// Complete using the raw token bytes
    pub fn complete_by_bytes<T: Serialize>(&self, token: &[u8], result: &T) -> Result<()> {
        let token = CompletionToken::from_bytes(token)?;
        self.complete(&token, result)
    }

    /// Fail using the raw token bytes
    pub fn fail_by_bytes(&self, token: &[u8], error: ActivityError) -> Result<()> {
        let token = CompletionToken::from_bytes(token)?;
        self.fail(&token, error)
    }
}

impl std::fmt::Debug for ActivityCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityCompletionClient")
            .field("encoding", &self.converter.encoding())
            .finish()
    }
}
