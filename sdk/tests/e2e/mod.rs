//! End-to-end tests for courier-sdk
//!
//! These tests run a complete engine in-process: workers poll real task
//! queues, activities and workflows are dispatched through the proxy, and
//! deferred results travel through the completion registry.
//!
//! # Running E2E tests
//!
//! ```bash
//! RUST_LOG=courier_sdk=debug cargo test --test e2e -p courier-sdk
//! ```

mod activity_tests;
mod completion_tests;
mod worker_tests;

use courier_sdk::config::{ClientConfig, WorkerConfig};
use courier_sdk::Courier;
use std::time::Duration;

/// Default timeout for E2E tests
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Invocation timeout used when a test expects a result
pub const INVOKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialize tracing once for all tests
static TRACING_INITIALIZED: std::sync::Once = std::sync::Once::new();

fn init_tracing() {
    TRACING_INITIALIZED.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_test_writer()
            .try_init();
    });
}

/// An engine with short poll and grace periods.
pub fn test_courier() -> Courier {
    init_tracing();

    Courier::builder()
        .config(ClientConfig::default().with_worker_config(WorkerConfig {
            max_concurrent_activities: 4,
            poll_timeout: Duration::from_millis(50),
            shutdown_grace: Duration::from_millis(500),
        }))
        .build()
        .expect("test configuration is valid")
}

/// Run a test with a timeout. Panics if the test takes longer than the specified duration.
pub async fn with_timeout<F, T>(timeout: Duration, test_name: &str, f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(result) => result,
        Err(_) => panic!("Test '{}' timed out after {:?}", test_name, timeout),
    }
}
