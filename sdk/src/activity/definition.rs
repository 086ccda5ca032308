//! ActivityDefinition trait

use crate::activity::context::ActivityContext;
use crate::error::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// Definition of an activity with typed input and output.
///
/// Several implementations of the same logical activity can live on one queue
/// when registered under different name prefixes.
#[async_trait]
pub trait ActivityDefinition: Send + Sync {
    /// Input type for the activity
    type Input: DeserializeOwned + Send;
    /// Output type for the activity
    type Output: Serialize + Send;

    /// Name the activity is dispatched by
    fn name(&self) -> &str;

    /// Execute the activity with the given input and context.
    ///
    /// If the implementation calls
    /// [`ActivityContext::do_not_complete_on_return`], the returned value is
    /// ignored and the invocation stays pending until completed by token.
    async fn execute(&self, input: Self::Input, ctx: &dyn ActivityContext) -> Result<Self::Output>;

    /// Optional description of the activity
    fn description(&self) -> Option<&str> {
        None
    }
}
