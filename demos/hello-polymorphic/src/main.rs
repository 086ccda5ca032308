//! Hello Polymorphic Activity Sample
//!
//! Two implementations of the same greeting activity live on one task queue.
//! Each is registered under its own name prefix (`Hello_`, `Bye_`) and the
//! workflow calls them in turn through prefixed activity stubs.

use async_trait::async_trait;
use courier_sdk::prelude::*;
use std::time::Duration;
use tracing::info;

/// One implementation of the greeting activity
pub struct ComposeGreeting {
    greeting: &'static str,
}

impl ComposeGreeting {
    pub const HELLO: ComposeGreeting = ComposeGreeting { greeting: "Hello" };
    pub const BYE: ComposeGreeting = ComposeGreeting { greeting: "Bye" };
}

#[async_trait]
impl ActivityDefinition for ComposeGreeting {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "compose"
    }

    fn description(&self) -> Option<&str> {
        Some("Greets a name with a fixed greeting")
    }

    async fn execute(&self, name: String, ctx: &dyn ActivityContext) -> Result<String> {
        info!(activity = %ctx.activity_name(), name = %name, "Composing greeting");
        Ok(format!("{} {}!", self.greeting, name))
    }
}

/// Calls every greeting implementation and joins the results, one per line
pub struct GreetingWorkflow;

impl GreetingWorkflow {
    pub const PREFIXES: [&'static str; 2] = ["Hello_", "Bye_"];
}

#[async_trait]
impl WorkflowDefinition for GreetingWorkflow {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "greeting"
    }

    async fn execute(&self, ctx: &WorkflowContext, name: String) -> Result<String> {
        let options = ActivityOptions::new().with_schedule_to_close_timeout(Duration::from_secs(2));

        let mut result = String::new();
        for prefix in Self::PREFIXES {
            let stub = ctx.activity_stub(prefix, options.clone());
            let greeting: String = stub.call_typed("compose", &name).await?;
            result.push_str(&greeting);
            result.push('\n');
        }
        Ok(result)
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hello_polymorphic=info".parse()?)
                .add_directive("courier_sdk=info".parse()?),
        )
        .init();

    let task_queue = std::env::var("COURIER_TASK_QUEUE")
        .unwrap_or_else(|_| "HelloPolymorphicActivityTaskQueue".to_string());
    let workflow_id = std::env::var("COURIER_WORKFLOW_ID")
        .unwrap_or_else(|_| "HelloPolymorphicActivityWorkflow".to_string());

    info!(task_queue = %task_queue, "Starting Hello Polymorphic Activity Sample");

    let courier = Courier::builder().build()?;
    let factory = courier.worker_factory();

    let worker = factory.new_worker(&task_queue);
    worker.register_workflow(GreetingWorkflow);
    worker.register_activity_with_prefix("Hello_", ComposeGreeting::HELLO);
    worker.register_activity_with_prefix("Bye_", ComposeGreeting::BYE);
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
