//! WorkflowDefinition trait

use crate::error::Result;
use crate::workflow::context::WorkflowContext;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// Definition of a workflow with typed input and output
#[async_trait]
pub trait WorkflowDefinition: Send + Sync {
    /// Input type for the workflow
    type Input: DeserializeOwned + Send;
    /// Output type for the workflow
    type Output: Serialize + Send;

    /// Name the workflow is started by
    fn name(&self) -> &str;

    /// Execute the workflow with the given context and input
    async fn execute(&self, ctx: &WorkflowContext, input: Self::Input) -> Result<Self::Output>;

    /// Optional description of the workflow
    fn description(&self) -> Option<&str> {
        None
    }
}
