//! Mock activity context for unit testing activities in isolation.

use crate::activity::ActivityContext;
use crate::completion::{ActivityCompletionClient, CompletionRegistry, PendingInvocation};
use crate::error::Result;
use courier_core::{CompletionToken, DataConverter, JsonDataConverter};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Mock implementation of ActivityContext for testing activities in isolation.
///
/// The context owns a private completion registry with one issued token, so
/// an activity that defers its completion can be observed end to end:
///
/// ```ignore
/// use courier_sdk::testing::MockActivityContext;
///
/// let ctx = MockActivityContext::builder().activity_name("charge").build();
/// let out = ChargeCard.execute(input, &ctx).await?;
/// assert!(ctx.was_deferred());
///
/// let delivered = ctx.deferred_result(Duration::from_secs(1)).await;
/// ```
#[derive(Clone)]
pub struct MockActivityContext {
    inner: Arc<MockActivityContextInner>,
}

struct MockActivityContextInner {
    task_id: Uuid,
    activity_name: String,
    task_queue: String,
    workflow_id: Option<String>,
    deferred: AtomicBool,
    token: CompletionToken,
    pending: Mutex<Option<PendingInvocation>>,
    completions: Arc<CompletionRegistry>,
    converter: Arc<dyn DataConverter>,
}

impl MockActivityContext {
    /// Create a new builder for MockActivityContext.
    pub fn builder() -> MockActivityContextBuilder {
        MockActivityContextBuilder::default()
    }

    /// Create a simple mock context with default values.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Whether the activity asked not to be completed on return.
    pub fn was_deferred(&self) -> bool {
        self.inner.deferred.load(Ordering::SeqCst)
    }

    /// Whether the context's token is still waiting for a result.
    pub fn is_pending(&self) -> bool {
        self.inner.completions.is_pending(&self.inner.token)
    }

    /// Wait for a result delivered through the completion client.
    ///
    /// Returns `None` on timeout, or if the result was already taken.
    pub async fn deferred_result(&self, timeout: Duration) -> Option<Result<Value>> {
        let pending = self.inner.pending.lock().take()?;
        let outcome = pending.wait(timeout).await?;
        Some(outcome.and_then(|payload| Ok(self.inner.converter.from_payload(&payload)?)))
    }
}

impl Default for MockActivityContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for MockActivityContext.
#[derive(Default)]
pub struct MockActivityContextBuilder {
    task_id: Option<Uuid>,
    activity_name: Option<String>,
    task_queue: Option<String>,
    workflow_id: Option<String>,
}

impl MockActivityContextBuilder {
    /// Set the task ID.
    pub fn task_id(mut self, id: Uuid) -> Self {
        self.task_id = Some(id);
        self
    }

    /// Set the activity name.
    pub fn activity_name(mut self, name: impl Into<String>) -> Self {
        self.activity_name = Some(name.into());
        self
    }

    /// Set the task queue.
    pub fn task_queue(mut self, queue: impl Into<String>) -> Self {
        self.task_queue = Some(queue.into());
        self
    }

    /// Set the calling workflow's id.
    pub fn workflow_id(mut self, id: impl Into<String>) -> Self {
        self.workflow_id = Some(id.into());
        self
    }

    /// Build the MockActivityContext.
    pub fn build(self) -> MockActivityContext {
        let activity_name = self.activity_name.unwrap_or_else(|| "mock".to_string());
        let completions = Arc::new(CompletionRegistry::default());
        let pending = completions.issue(activity_name.clone());

        MockActivityContext {
            inner: Arc::new(MockActivityContextInner {
                task_id: self.task_id.unwrap_or_else(Uuid::new_v4),
                activity_name,
                task_queue: self.task_queue.unwrap_or_else(|| "test".to_string()),
                workflow_id: self.workflow_id,
                deferred: AtomicBool::new(false),
                token: pending.token(),
                pending: Mutex::new(Some(pending)),
                completions,
                converter: Arc::new(JsonDataConverter),
            }),
        }
    }
}

impl ActivityContext for MockActivityContext {
    fn task_id(&self) -> Uuid {
        self.inner.task_id
    }

    fn task_token(&self) -> CompletionToken {
        self.inner.token
    }

    fn activity_name(&self) -> &str {
        &self.inner.activity_name
    }

    fn task_queue(&self) -> &str {
        &self.inner.task_queue
    }

    fn workflow_id(&self) -> Option<&str> {
        self.inner.workflow_id.as_deref()
    }

    fn do_not_complete_on_return(&self) {
        self.inner.deferred.store(true, Ordering::SeqCst);
    }

    fn is_do_not_complete_on_return(&self) -> bool {
        self.was_deferred()
    }

    fn completion_client(&self) -> ActivityCompletionClient {
        ActivityCompletionClient::new(
            Arc::clone(&self.inner.completions),
            Arc::clone(&self.inner.converter),
        )
    }
}

impl std::fmt::Debug for MockActivityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockActivityContext")
            .field("activity_name", &self.inner.activity_name)
            .field("token", &self.inner.token)
            .field("deferred", &self.was_deferred())
            .finish()
    }
}
