//! Deferred completion E2E tests
//!
//! An activity returns without a result and its invocation is resolved later,
//! out of band, through the completion token.

use crate::fixtures::{CaptureToken, DeferredCompose};
use crate::{test_courier, with_timeout, INVOKE_TIMEOUT, TEST_TIMEOUT};
use courier_sdk::error::CourierError;
use courier_sdk::ActivityError;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_e2e_deferred_completion_returns_result() {
    with_timeout(TEST_TIMEOUT, "test_e2e_deferred_completion_returns_result", async {
        let courier = test_courier();
        let worker = courier.new_worker("async-completion");
        worker.register_activity(DeferredCompose {
            delay: Duration::from_millis(50),
        });
        let handle = worker.start();

        let out = courier
            .activity_proxy()
            .invoke("async-completion", "deferred_compose", json!("World"), INVOKE_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(out, json!("Hello World!"));

        let metrics = handle.metrics();
        assert_eq!(metrics.tasks_deferred, 1);
        assert_eq!(metrics.tasks_completed, 0);
        handle.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_e2e_second_completion_is_invalid_token() {
    with_timeout(TEST_TIMEOUT, "test_e2e_second_completion_is_invalid_token", async {
        let courier = test_courier();
        let (tx, mut tokens) = mpsc::unbounded_channel();
        let worker = courier.new_worker("capture");
        worker.register_activity(CaptureToken { tokens: tx });
        let handle = worker.start();

        let proxy = courier.activity_proxy();
        let invocation = tokio::spawn(async move {
            proxy
                .invoke("capture", "capture_token", json!(null), INVOKE_TIMEOUT)
                .await
        });

        let token = tokens.recv().await.expect("activity sends its token");
        let client = courier.completion_client();
        client.complete(&token, &json!({"r": 1})).unwrap();

        assert!(matches!(
            client.complete(&token, &json!({"r": 2})),
            Err(CourierError::InvalidToken(_))
        ));
        assert!(matches!(
            client.fail(&token, ActivityError::new("too late")),
            Err(CourierError::InvalidToken(_))
        ));

        let out = invocation.await.unwrap().unwrap();
        assert_eq!(out, json!({"r": 1}));
        handle.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_e2e_deferred_failure_by_bytes() {
    with_timeout(TEST_TIMEOUT, "test_e2e_deferred_failure_by_bytes", async {
        let courier = test_courier();
        let (tx, mut tokens) = mpsc::unbounded_channel();
        let worker = courier.new_worker("capture-fail");
        worker.register_activity(CaptureToken { tokens: tx });
        let handle = worker.start();

        let proxy = courier.activity_proxy();
        let invocation = tokio::spawn(async move {
            proxy
                .invoke("capture-fail", "capture_token", json!(null), INVOKE_TIMEOUT)
                .await
        });

        let token = tokens.recv().await.unwrap();
        courier
            .completion_client()
            .fail_by_bytes(
                &token.to_bytes(),
                ActivityError::new("gave up").with_type("ABANDONED"),
            )
            .unwrap();

        match invocation.await.unwrap() {
            Err(CourierError::ActivityFailure { activity, error }) => {
                assert_eq!(activity, "capture_token");
                assert_eq!(error.error_type.as_deref(), Some("ABANDONED"));
            }
            other => panic!("expected ActivityFailure, got {:?}", other),
        }
        handle.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_e2e_timeout_then_late_completion_is_discarded() {
    with_timeout(TEST_TIMEOUT, "test_e2e_timeout_then_late_completion_is_discarded", async {
        let courier = test_courier();
        let (tx, mut tokens) = mpsc::unbounded_channel();
        let worker = courier.new_worker("slow");
        worker.register_activity(CaptureToken { tokens: tx });
        let handle = worker.start();

        let result = courier
            .activity_proxy()
            .invoke("slow", "capture_token", json!(null), Duration::from_millis(100))
            .await;
        match result {
            Err(CourierError::ActivityTimeout { activity, timeout }) => {
                assert_eq!(activity, "capture_token");
                assert_eq!(timeout, Duration::from_millis(100));
            }
            other => panic!("expected ActivityTimeout, got {:?}", other),
        }
        assert_eq!(courier.completions().pending_count(), 0);

        // The late completion is accepted and has no effect
        let token = tokens.recv().await.unwrap();
        let client = courier.completion_client();
        assert!(client.complete(&token, &json!("late")).is_ok());
        assert_eq!(courier.completions().tombstone_count(), 0);
        assert!(matches!(
            client.complete(&token, &json!("later")),
            Err(CourierError::InvalidToken(_))
        ));
        handle.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_e2e_invoke_without_worker_times_out() {
    with_timeout(TEST_TIMEOUT, "test_e2e_invoke_without_worker_times_out", async {
        let courier = test_courier();
        let result = courier
            .activity_proxy()
            .invoke("nobody-home", "compose", json!(null), Duration::from_millis(50))
            .await;
        assert!(matches!(result, Err(CourierError::ActivityTimeout { .. })));

        // The task stays queued for a worker that never comes
        let queued = courier.queues().get_or_create("nobody-home").try_recv();
        assert!(queued.is_some());
    })
    .await;
}
