//! WorkerFactory - creates, starts and stops a set of workers together

use crate::client::Courier;
use crate::config::WorkerConfig;
use crate::worker::queue_worker::{Worker, WorkerHandle};
use courier_core::StopReason;
use parking_lot::Mutex;
use tracing::info;

/// Owns the workers of one process
pub struct WorkerFactory {
    courier: Courier,
    pending: Mutex<Vec<Worker>>,
    running: Mutex<Vec<WorkerHandle>>,
}

impl WorkerFactory {
    pub fn new(courier: Courier) -> Self {
        Self {
            courier,
            pending: Mutex::new(Vec::new()),
            running: Mutex::new(Vec::new()),
        }
    }

    /// Create a worker for `task_queue` with the engine's worker configuration
    pub fn new_worker(&self, task_queue: &str) -> Worker {
        self.new_worker_with_config(task_queue, self.courier.config().worker.clone())
    }

    /// Create a worker with an explicit configuration
    pub fn new_worker_with_config(&self, task_queue: &str, config: WorkerConfig) -> Worker {
        let worker = Worker::new(self.courier.clone(), task_queue, config);
        self.pending.lock().push(worker.clone());
        worker
    }

    /// Start every worker created since the last call
    pub fn start(&self) {
        let workers = std::mem::take(&mut *self.pending.lock());
        let handles: Vec<WorkerHandle> = workers.iter().map(|w| w.start()).collect();
        info!(workers = handles.len(), "Worker factory started");
        self.running.lock().extend(handles);
    }

    /// Number of started workers
    pub fn running_count(&self) -> usize {
        self.running.lock().len()
    }

    /// Shut down every started worker
    pub async fn shutdown(&self) -> Vec<StopReason> {
        let handles = std::mem::take(&mut *self.running.lock());
        let mut reasons = Vec::with_capacity(handles.len());
        for handle in handles {
            reasons.push(handle.shutdown().await);
        }
        info!(workers = reasons.len(), "Worker factory stopped");
        reasons
    }
}

impl std::fmt::Debug for WorkerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerFactory")
            .field("pending", &self.pending.lock().len())
            .field("running", &self.running_count())
            .finish()
    }
}
