//! Test workflow definitions for E2E tests

#![allow(dead_code)]

use async_trait::async_trait;
use courier_sdk::error::Result;
use courier_sdk::proxy::ActivityOptions;
use courier_sdk::workflow::{join2, join_all, WorkflowContext, WorkflowDefinition};
use serde_json::{json, Value};

/// Calls `compose` once: `"World"` -> `"Hello World!"`.
pub struct HelloWorkflow;

#[async_trait]
impl WorkflowDefinition for HelloWorkflow {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "hello"
    }

    async fn execute(&self, ctx: &WorkflowContext, name: String) -> Result<String> {
        ctx.execute_activity_typed("compose", &("Hello", name)).await
    }
}

/// Calls every prefixed implementation of `compose` in turn and joins the
/// greetings with newlines.
pub struct PolymorphicGreetingWorkflow;

impl PolymorphicGreetingWorkflow {
    pub const PREFIXES: [&'static str; 2] = ["Hello_", "Bye_"];
}

#[async_trait]
impl WorkflowDefinition for PolymorphicGreetingWorkflow {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "greet_all"
    }

    async fn execute(&self, ctx: &WorkflowContext, name: String) -> Result<String> {
        let mut out = String::new();
        for prefix in Self::PREFIXES {
            let stub = ctx.activity_stub(prefix, ActivityOptions::default());
            let greeting: String = stub.call_typed("compose", &name).await?;
            out.push_str(&greeting);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Runs the Hello and Bye chains concurrently and joins them.
pub struct AsyncLambdaWorkflow;

#[async_trait]
impl WorkflowDefinition for AsyncLambdaWorkflow {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "async_lambda"
    }

    async fn execute(&self, ctx: &WorkflowContext, name: String) -> Result<String> {
        let chain = |greeting: &'static str| {
            let ctx = ctx.clone();
            let name = name.clone();
            ctx.clone().spawn(async move {
                ctx.execute_activity_typed::<_, String>("compose", &(greeting, name))
                    .await
            })
        };

        let (hello, bye) = join2(chain("Hello"), chain("Bye")).await;
        Ok(format!("{}\n{}\n", hello?, bye?))
    }
}

/// Fans out one `delayed_echo` per delay and returns the values in input order.
pub struct FanOutWorkflow;

#[async_trait]
impl WorkflowDefinition for FanOutWorkflow {
    type Input = Vec<u64>;
    type Output = Vec<Value>;

    fn name(&self) -> &str {
        "fan_out"
    }

    async fn execute(&self, ctx: &WorkflowContext, delays: Vec<u64>) -> Result<Vec<Value>> {
        let branches: Vec<_> = delays
            .into_iter()
            .enumerate()
            .map(|(i, delay_ms)| {
                let ctx = ctx.clone();
                ctx.clone().spawn(async move {
                    ctx.execute_activity("delayed_echo", json!({"value": i, "delay_ms": delay_ms}))
                        .await
                })
            })
            .collect();
        join_all(branches).await
    }
}

/// Calls `decline`; the failure propagates out of the workflow.
pub struct DecliningWorkflow;

#[async_trait]
impl WorkflowDefinition for DecliningWorkflow {
    type Input = Value;
    type Output = Value;

    fn name(&self) -> &str {
        "declining"
    }

    async fn execute(&self, ctx: &WorkflowContext, input: Value) -> Result<Value> {
        ctx.execute_activity("decline", input).await
    }
}

/// Calls the deferred `deferred_compose` activity.
pub struct DeferredWorkflow;

#[async_trait]
impl WorkflowDefinition for DeferredWorkflow {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "deferred"
    }

    async fn execute(&self, ctx: &WorkflowContext, name: String) -> Result<String> {
        ctx.execute_activity_typed("deferred_compose", &name).await
    }
}
