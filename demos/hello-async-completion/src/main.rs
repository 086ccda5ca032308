//! Hello Async Activity Completion Sample
//!
//! The activity hands its completion token to a background task and returns
//! immediately without a result. The background task later completes the
//! invocation through the completion client, unblocking the workflow.

use async_trait::async_trait;
use courier_sdk::prelude::*;
use std::time::Duration;
use tracing::{info, warn};

/// Composes the greeting off the dispatch loop
pub struct ComposeGreeting;

impl ComposeGreeting {
    async fn compose_async(
        client: ActivityCompletionClient,
        token: CompletionToken,
        greeting: String,
        name: String,
    ) {
        let result = format!("{} {}!", greeting, name);
        if let Err(e) = client.complete(&token, &result) {
            warn!(token = %token, error = %e, "Completion rejected");
        }
    }
}

#[async_trait]
impl ActivityDefinition for ComposeGreeting {
    type Input = (String, String);
    type Output = String;

    fn name(&self) -> &str {
        "compose_greeting"
    }

    async fn execute(&self, input: (String, String), ctx: &dyn ActivityContext) -> Result<String> {
        let (greeting, name) = input;
        let token = ctx.task_token();
        info!(token = %token, "Deferring completion");

        tokio::spawn(Self::compose_async(
            ctx.completion_client(),
            token,
            greeting,
            name,
        ));
        ctx.do_not_complete_on_return();
        Ok("ignored".to_string())
    }
}

pub struct GreetingWorkflow;

#[async_trait]
impl WorkflowDefinition for GreetingWorkflow {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "greeting"
    }

    async fn execute(&self, ctx: &WorkflowContext, name: String) -> Result<String> {
        let options = ActivityOptions::new().with_schedule_to_close_timeout(Duration::from_secs(10));
        ctx.activity_stub("", options)
            .call_typed("compose_greeting", &("Hello", name))
            .await
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hello_async_completion=info".parse()?)
                .add_directive("courier_sdk=info".parse()?),
        )
        .init();

    let task_queue = std::env::var("COURIER_TASK_QUEUE")
        .unwrap_or_else(|_| "HelloAsyncActivityCompletionTaskQueue".to_string());
    let workflow_id = std::env::var("COURIER_WORKFLOW_ID")
        .unwrap_or_else(|_| "HelloAsyncActivityCompletionWorkflow".to_string());

    info!(task_queue = %task_queue, "Starting Hello Async Activity Completion Sample");

    let courier = Courier::builder().build()?;
    let factory = courier.worker_factory();

    let worker = factory.new_worker(&task_queue);
    worker.register_workflow(GreetingWorkflow);
    worker.register_activity(ComposeGreeting);
    factory.start();

    let handle = courier.workflow_client().start_workflow_typed(
        "greeting",
        "World",
        WorkflowOptions::new(&task_queue).with_workflow_id(workflow_id),
    )?;
    let greeting: String = handle.result_typed().await?;
    println!("{}", greeting);

    factory.shutdown().await;
    Ok(())
}
