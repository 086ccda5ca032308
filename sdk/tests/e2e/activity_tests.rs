//! Activity invocation E2E tests

use crate::fixtures::{Compose, ComposeGreeting, Decline, RefusingConverter};
use crate::{test_courier, with_timeout, INVOKE_TIMEOUT, TEST_TIMEOUT};
use courier_sdk::error::CourierError;
use courier_sdk::proxy::ActivityOptions;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_e2e_compose_returns_greeting() {
    with_timeout(TEST_TIMEOUT, "test_e2e_compose_returns_greeting", async {
        let courier = test_courier();
        let worker = courier.new_worker("hello-activity");
        worker.register_activity(Compose);
        let handle = worker.start();

        let out = courier
            .activity_proxy()
            .invoke("hello-activity", "compose", json!(["Hello", "World"]), INVOKE_TIMEOUT)
            .await
            .expect("compose should succeed");
        assert_eq!(out, json!("Hello World!"));

        handle.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_e2e_synchronous_completion_delivered_once() {
    with_timeout(TEST_TIMEOUT, "test_e2e_synchronous_completion_delivered_once", async {
        let courier = test_courier();
        let calls = Arc::new(AtomicUsize::new(0));
        let worker = courier.new_worker("once");
        {
            let calls = Arc::clone(&calls);
            worker.register_activity_fn("count", move |_ctx, input| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(input)
                }
            });
        }
        let handle = worker.start();

        let out = courier
            .activity_proxy()
            .invoke("once", "count", json!({"r": 7}), INVOKE_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(out, json!({"r": 7}));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(courier.completions().pending_count(), 0);

        let metrics = handle.metrics();
        assert_eq!(metrics.tasks_polled, 1);
        assert_eq!(metrics.tasks_completed, 1);
        handle.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_e2e_polymorphic_stub_calls() {
    with_timeout(TEST_TIMEOUT, "test_e2e_polymorphic_stub_calls", async {
        let courier = test_courier();
        let worker = courier.new_worker("polymorphic");
        worker.register_activity_with_prefix("Hello_", ComposeGreeting::HELLO);
        worker.register_activity_with_prefix("Bye_", ComposeGreeting::BYE);
        let handle = worker.start();

        let proxy = courier.activity_proxy();
        let options = ActivityOptions::new()
            .with_task_queue("polymorphic")
            .with_schedule_to_close_timeout(INVOKE_TIMEOUT);

        let mut out = String::new();
        for prefix in ["Hello_", "Bye_"] {
            let greeting: String = proxy
                .stub(prefix, options.clone())
                .call_typed("compose", "World")
                .await
                .unwrap();
            out.push_str(&greeting);
            out.push('\n');
        }
        assert_eq!(out, "Hello World!\nBye World!\n");

        handle.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_e2e_failure_carries_handler_payload() {
    with_timeout(TEST_TIMEOUT, "test_e2e_failure_carries_handler_payload", async {
        let courier = test_courier();
        let worker = courier.new_worker("failing");
        worker.register_activity(Decline);
        let handle = worker.start();

        let result = courier
            .activity_proxy()
            .invoke("failing", "decline", json!("card-1"), INVOKE_TIMEOUT)
            .await;
        match result {
            Err(CourierError::ActivityFailure { activity, error }) => {
                assert_eq!(activity, "decline");
                assert_eq!(error.error_type.as_deref(), Some("DECLINED"));
                assert_eq!(error.message, "declined \"card-1\"");
            }
            other => panic!("expected ActivityFailure, got {:?}", other),
        }
        assert_eq!(handle.metrics().tasks_failed, 1);
        handle.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_e2e_unknown_activity_not_found() {
    with_timeout(TEST_TIMEOUT, "test_e2e_unknown_activity_not_found", async {
        let courier = test_courier();
        let worker = courier.new_worker("sparse");
        worker.register_activity(Compose);
        let handle = worker.start();

        let result = courier
            .activity_proxy()
            .invoke("sparse", "missing", json!(null), INVOKE_TIMEOUT)
            .await;
        assert!(matches!(
            result,
            Err(CourierError::NotFound { ref queue, ref name }) if queue == "sparse" && name == "missing"
        ));
        handle.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_e2e_bad_input_is_activity_failure() {
    with_timeout(TEST_TIMEOUT, "test_e2e_bad_input_is_activity_failure", async {
        let courier = test_courier();
        let worker = courier.new_worker("typed");
        worker.register_activity(Compose);
        let handle = worker.start();

        let result = courier
            .activity_proxy()
            .invoke("typed", "compose", json!({"not": "a pair"}), INVOKE_TIMEOUT)
            .await;
        match result {
            Err(CourierError::ActivityFailure { error, .. }) => {
                assert_eq!(error.error_type.as_deref(), Some("INVALID_INPUT"));
            }
            other => panic!("expected ActivityFailure, got {:?}", other),
        }
        handle.shutdown().await;
    })
    .await;
}

/// An engine whose converter cannot encode [`RefusingConverter::REFUSED`]
fn refusing_courier() -> courier_sdk::Courier {
    courier_sdk::Courier::builder()
        .worker_config(courier_sdk::config::WorkerConfig {
            max_concurrent_activities: 2,
            poll_timeout: std::time::Duration::from_millis(50),
            shutdown_grace: std::time::Duration::from_millis(500),
        })
        .data_converter(RefusingConverter)
        .build()
        .expect("test configuration is valid")
}

#[tokio::test]
async fn test_e2e_unencodable_output_fails_invocation() {
    with_timeout(TEST_TIMEOUT, "test_e2e_unencodable_output_fails_invocation", async {
        let courier = refusing_courier();
        let worker = courier.new_worker("encoding");
        worker.register_activity_fn("refused", |_ctx, _input| async move {
            Ok(json!(RefusingConverter::REFUSED))
        });
        let handle = worker.start();

        let started = std::time::Instant::now();
        let result = courier
            .activity_proxy()
            .invoke("encoding", "refused", json!(null), INVOKE_TIMEOUT)
            .await;
        assert!(started.elapsed() < INVOKE_TIMEOUT / 2);
        match result {
            Err(CourierError::ActivityFailure { activity, error }) => {
                assert_eq!(activity, "refused");
                assert!(error.message.contains("refused to encode"));
            }
            other => panic!("expected ActivityFailure, got {:?}", other),
        }

        let metrics = handle.metrics();
        assert_eq!(metrics.tasks_failed, 1);
        assert_eq!(metrics.tasks_completed, 0);
        handle.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_e2e_unencodable_workflow_output_fails_workflow() {
    with_timeout(TEST_TIMEOUT, "test_e2e_unencodable_workflow_output_fails_workflow", async {
        let courier = refusing_courier();
        let worker = courier.new_worker("encoding-workflow");
        worker.register_workflow_fn("refused", |_ctx, _input| async move {
            Ok(json!(RefusingConverter::REFUSED))
        });
        let handle = worker.start();

        let started = std::time::Instant::now();
        let result = courier
            .workflow_client()
            .execute_workflow(
                "refused",
                json!(null),
                courier_sdk::client::WorkflowOptions::new("encoding-workflow")
                    .with_workflow_id("wf-refused")
                    .with_execution_timeout(INVOKE_TIMEOUT),
            )
            .await;
        assert!(started.elapsed() < INVOKE_TIMEOUT / 2);
        match result {
            Err(CourierError::WorkflowFailed { workflow_id, error }) => {
                assert_eq!(workflow_id, "wf-refused");
                assert!(error.message.contains("refused to encode"));
            }
            other => panic!("expected WorkflowFailed, got {:?}", other),
        }
        handle.shutdown().await;
    })
    .await;
}
