//! Lock-free counters behind a worker's metrics snapshot

use courier_core::WorkerMetrics;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters updated by dispatch loops
#[derive(Debug, Default)]
pub(crate) struct MetricsRecorder {
    polled: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    deferred: AtomicU64,
    workflows_started: AtomicU64,
    in_flight: AtomicUsize,
    timed: AtomicU64,
    total_duration_us: AtomicU64,
    started_at: Mutex<Option<Instant>>,
}

impl MetricsRecorder {
    pub fn mark_started(&self) {
        *self.started_at.lock() = Some(Instant::now());
    }

    pub fn record_polled(&self) {
        self.polled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_started(&self) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_finished(&self, duration: Duration) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.timed.fetch_add(1, Ordering::Relaxed);
        self.total_duration_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deferred(&self) {
        self.deferred.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_workflow_started(&self) {
        self.workflows_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> WorkerMetrics {
        let timed = self.timed.load(Ordering::Relaxed);
        let avg_task_duration_ms = if timed > 0 {
            self.total_duration_us.load(Ordering::Relaxed) as f64 / timed as f64 / 1000.0
        } else {
            0.0
        };

        WorkerMetrics {
            tasks_polled: self.polled.load(Ordering::Relaxed),
            tasks_completed: self.completed.load(Ordering::Relaxed),
            tasks_failed: self.failed.load(Ordering::Relaxed),
            tasks_deferred: self.deferred.load(Ordering::Relaxed),
            workflows_started: self.workflows_started.load(Ordering::Relaxed),
            in_flight: self.in_flight(),
            avg_task_duration_ms,
            uptime: self
                .started_at
                .lock()
                .map(|t| t.elapsed())
                .unwrap_or_default(),
        }
    }
}
