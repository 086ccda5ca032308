//! ActivityContext trait definition

use crate::completion::ActivityCompletionClient;
use courier_core::CompletionToken;
use uuid::Uuid;

/// Context for one activity execution.
///
/// Exposes the invocation's completion token so an activity can return
/// without a result and have it delivered later, from anywhere.
pub trait ActivityContext: Send + Sync {
    /// Unique ID of the task being executed
    fn task_id(&self) -> Uuid;

    /// Token of the invocation waiting for this activity's result
    fn task_token(&self) -> CompletionToken;

    /// Registered name the task was dispatched by
    fn activity_name(&self) -> &str;

    /// Queue the task was polled from
    fn task_queue(&self) -> &str;

    /// Id of the workflow that invoked this activity, if any
    fn workflow_id(&self) -> Option<&str>;

    /// Ask the worker not to complete the invocation with the return value.
    ///
    /// The result must then be delivered through the completion client
    /// using [`task_token`](Self::task_token).
    fn do_not_complete_on_return(&self);

    /// Whether completion has been deferred
    fn is_do_not_complete_on_return(&self) -> bool;

    /// Client for completing invocations by token
    fn completion_client(&self) -> ActivityCompletionClient;
}
