//! Hello Async Lambda Sample
//!
//! The workflow launches two independent activity chains without waiting for
//! either, then joins them. Each chain fetches a greeting and composes it
//! with the name.

use async_trait::async_trait;
use courier_sdk::prelude::*;
use courier_sdk::FanOutFuture;
use std::time::Duration;
use tracing::info;

/// Returns the greeting to use
pub struct GetGreeting;

#[async_trait]
impl ActivityDefinition for GetGreeting {
    type Input = ();
    type Output = String;

    fn name(&self) -> &str {
        "get_greeting"
    }

    async fn execute(&self, _input: (), _ctx: &dyn ActivityContext) -> Result<String> {
        Ok("Hello".to_string())
    }
}

/// Joins a greeting and a name
pub struct ComposeGreeting;

#[async_trait]
impl ActivityDefinition for ComposeGreeting {
    type Input = (String, String);
    type Output = String;

    fn name(&self) -> &str {
        "compose_greeting"
    }

    async fn execute(&self, input: (String, String), _ctx: &dyn ActivityContext) -> Result<String> {
        let (greeting, name) = input;
        Ok(format!("{} {}!", greeting, name))
    }
}

pub struct GreetingWorkflow;

impl GreetingWorkflow {
    fn greet(ctx: &WorkflowContext, name: &str) -> FanOutFuture<String> {
        let stub = ctx.activity_stub(
            "",
            ActivityOptions::new().with_schedule_to_close_timeout(Duration::from_secs(10)),
        );
        let name = name.to_string();
        ctx.spawn(async move {
            let greeting: String = stub.call_typed("get_greeting", &()).await?;
            stub.call_typed("compose_greeting", &(greeting, name)).await
        })
    }
}

#[async_trait]
impl WorkflowDefinition for GreetingWorkflow {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "greeting"
    }

    async fn execute(&self, ctx: &WorkflowContext, name: String) -> Result<String> {
        let first = Self::greet(ctx, &name);
        let second = Self::greet(ctx, &name);

        let (first, second) = join2(first, second).await;
        Ok(format!("{}\n{}", first?, second?))
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hello_async_lambda=info".parse()?)
                .add_directive("courier_sdk=info".parse()?),
        )
        .init();

    let task_queue = std::env::var("COURIER_TASK_QUEUE")
        .unwrap_or_else(|_| "HelloAsyncLambdaTaskQueue".to_string());
    let workflow_id = std::env::var("COURIER_WORKFLOW_ID")
        .unwrap_or_else(|_| "HelloAsyncLambdaWorkflow".to_string());

    info!(task_queue = %task_queue, "Starting Hello Async Lambda Sample");

    let courier = Courier::builder().build()?;
    let factory = courier.worker_factory();

    let worker = factory.new_worker(&task_queue);
    worker.register_workflow(GreetingWorkflow);
    worker.register_activity(GetGreeting);
    worker.register_activity(ComposeGreeting);
    factory.start();

    let greeting: String = courier
        .workflow_client()
        .execute_workflow_typed(
            "greeting",
            "World",
            WorkflowOptions::new(&task_queue).with_workflow_id(workflow_id),
        )
        .await?;
    println!("{}", greeting);

    factory.shutdown().await;
    Ok(())
}
