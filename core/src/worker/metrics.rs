//! Worker metrics snapshot.

use std::time::Duration;

/// Runtime metrics for a worker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerMetrics {
    /// Tasks taken off the queue.
    pub tasks_polled: u64,

    /// Tasks whose handler returned a value.
    pub tasks_completed: u64,

    /// Tasks whose handler returned an error, panicked or was not found.
    pub tasks_failed: u64,

    /// Tasks whose handler deferred completion.
    pub tasks_deferred: u64,

    /// Workflow tasks handed to their own execution.
    pub workflows_started: u64,

    /// Tasks currently executing.
    pub in_flight: usize,

    /// Average handler execution time (milliseconds).
    pub avg_task_duration_ms: f64,

    /// Time since the worker started.
    pub uptime: Duration,
}

impl WorkerMetrics {
    /// Total tasks that reached a terminal or deferred outcome.
    pub fn total_executions(&self) -> u64 {
        self.tasks_completed + self.tasks_failed + self.tasks_deferred
    }
}
