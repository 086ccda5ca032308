//! Test activity definitions for E2E tests

#![allow(dead_code)]

use async_trait::async_trait;
use courier_sdk::activity::{ActivityContext, ActivityDefinition};
use courier_sdk::error::{CourierError, Result};
use courier_sdk::CompletionToken;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;

/// Activity joining a greeting and a name: `("Hello", "World")` -> `"Hello World!"`.
pub struct Compose;

#[async_trait]
impl ActivityDefinition for Compose {
    type Input = (String, String);
    type Output = String;

    fn name(&self) -> &str {
        "compose"
    }

    async fn execute(&self, input: (String, String), _ctx: &dyn ActivityContext) -> Result<String> {
        let (greeting, name) = input;
        Ok(format!("{} {}!", greeting, name))
    }
}

/// One implementation of a polymorphic greeting activity.
///
/// Registered with a prefix such as `Hello_` so that several implementations
/// of `compose` can share a queue.
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

    async fn execute(&self, name: String, _ctx: &dyn ActivityContext) -> Result<String> {
        Ok(format!("{} {}!", self.greeting, name))
    }
}

#[derive(Debug, Deserialize)]
pub struct DelayedInput {
    pub value: Value,
    pub delay_ms: u64,
}

/// Activity that sleeps, then echoes its value.
pub struct DelayedEcho;

#[async_trait]
impl ActivityDefinition for DelayedEcho {
    type Input = DelayedInput;
    type Output = Value;

    fn name(&self) -> &str {
        "delayed_echo"
    }

    async fn execute(&self, input: DelayedInput, _ctx: &dyn ActivityContext) -> Result<Value> {
        tokio::time::sleep(Duration::from_millis(input.delay_ms)).await;
        Ok(input.value)
    }
}

/// Activity that always fails with error type `DECLINED`.
pub struct Decline;

#[async_trait]
impl ActivityDefinition for Decline {
    type Input = Value;
    type Output = Value;

    fn name(&self) -> &str {
        "decline"
    }

    async fn execute(&self, input: Value, _ctx: &dyn ActivityContext) -> Result<Value> {
        Err(CourierError::application(
            "DECLINED",
            format!("declined {}", input),
        ))
    }
}

/// Activity that returns immediately and completes its invocation later
/// from a spawned task.
pub struct DeferredCompose {
    pub delay: Duration,
}

#[async_trait]
impl ActivityDefinition for DeferredCompose {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "deferred_compose"
    }

    async fn execute(&self, name: String, ctx: &dyn ActivityContext) -> Result<String> {
        ctx.do_not_complete_on_return();
        let client = ctx.completion_client();
        let token = ctx.task_token();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = client.complete(&token, &format!("Hello {}!", name)) {
                tracing::warn!(error = %e, "Deferred completion rejected");
            }
        });

        // Ignored: completion was deferred
        Ok(String::new())
    }
}

/// Activity that defers completion and hands its token to the test.
pub struct CaptureToken {
    pub tokens: mpsc::UnboundedSender<CompletionToken>,
}

#[async_trait]
impl ActivityDefinition for CaptureToken {
    type Input = Value;
    type Output = Value;

    fn name(&self) -> &str {
        "capture_token"
    }

    async fn execute(&self, _input: Value, ctx: &dyn ActivityContext) -> Result<Value> {
        ctx.do_not_complete_on_return();
        self.tokens
            .send(ctx.task_token())
            .map_err(|e| CourierError::Other(e.to_string()))?;
        Ok(Value::Null)
    }
}
