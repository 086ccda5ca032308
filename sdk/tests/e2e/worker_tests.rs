//! Worker lifecycle E2E tests

use crate::fixtures::{DelayedEcho, HelloWorkflow};
use crate::{test_courier, with_timeout, INVOKE_TIMEOUT, TEST_TIMEOUT};
use courier_sdk::config::WorkerConfig;
use courier_sdk::{DispatchState, StopReason, WorkerStatus};
use serde_json::json;
use std::time::{Duration, Instant};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_e2e_loops_execute_concurrently() {
    with_timeout(TEST_TIMEOUT, "test_e2e_loops_execute_concurrently", async {
        let courier = test_courier();
        let worker = courier.new_worker("concurrent");
        worker.register_activity(DelayedEcho);
        let handle = worker.start();

        let proxy = courier.activity_proxy();
        let started = Instant::now();
        let calls: Vec<_> = (0..4)
            .map(|i| {
                let proxy = proxy.clone();
                tokio::spawn(async move {
                    proxy
                        .invoke(
                            "concurrent",
                            "delayed_echo",
                            json!({"value": i, "delay_ms": 300}),
                            INVOKE_TIMEOUT,
                        )
                        .await
                })
            })
            .collect();
        for call in calls {
            call.await.unwrap().unwrap();
        }

        // Four loops run the four sleeps side by side
        assert!(started.elapsed() < Duration::from_millis(1100));
        assert_eq!(handle.metrics().tasks_completed, 4);
        handle.shutdown().await;
    })
    .await;
}

#[tokio::test]
async fn test_e2e_shutdown_drains_and_stops() {
    with_timeout(TEST_TIMEOUT, "test_e2e_shutdown_drains_and_stops", async {
        let courier = test_courier();
        let factory = courier.worker_factory();
        let worker = factory.new_worker_with_config(
            "lifecycle",
            WorkerConfig::LOW_RESOURCE.with_max_concurrent_activities(2),
        );
        worker.register_activity(DelayedEcho);
        worker.register_workflow(HelloWorkflow);
        factory.start();
        assert_eq!(factory.running_count(), 1);

        let out = courier
            .activity_proxy()
            .invoke("lifecycle", "delayed_echo", json!({"value": "x", "delay_ms": 1}), INVOKE_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(out, json!("x"));

        let reasons = factory.shutdown().await;
        assert_eq!(reasons, vec![StopReason::Graceful]);
        assert_eq!(factory.running_count(), 0);
    })
    .await;
}

#[tokio::test]
async fn test_e2e_handle_reports_status() {
    with_timeout(TEST_TIMEOUT, "test_e2e_handle_reports_status", async {
        let courier = test_courier();
        let handle = courier.new_worker("status").start();

        match handle.status() {
            WorkerStatus::Running { loops, .. } => assert_eq!(loops, 4),
            other => panic!("expected Running, got {:?}", other),
        }
        assert_eq!(handle.dispatch_states().len(), 4);
        assert!(handle
            .dispatch_states()
            .iter()
            .all(|s| matches!(s, DispatchState::Idle | DispatchState::Polling)));

        assert_eq!(handle.shutdown().await, StopReason::Graceful);
    })
    .await;
}
