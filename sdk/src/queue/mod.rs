//! In-memory task queues
//!
//! Each named queue is an unbounded channel. Every dispatch loop polling a
//! queue shares the same receiver, so a task is received by exactly one loop.

use crate::error::{CourierError, Result};
use courier_core::Task;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::trace;

/// A single named queue
#[derive(Clone)]
pub struct TaskQueue {
    name: Arc<str>,
    sender: mpsc::UnboundedSender<Task>,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<Task>>>,
}

impl TaskQueue {
    fn new(name: &str) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            name: Arc::from(name),
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueue a task
    pub fn send(&self, task: Task) -> Result<()> {
        trace!(queue = %self.name, task_id = %task.id, name = %task.name, "Enqueue task");
        self.sender
            .send(task)
            .map_err(|_| CourierError::Other(format!("task queue {} is closed", self.name)))
    }

    /// Wait for the next task. Returns `None` if the queue is closed.
    pub async fn recv(&self) -> Option<Task> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await
    }

    /// Wait up to `timeout` for the next task
    pub async fn recv_timeout(&self, timeout: Duration) -> Option<Task> {
        tokio::time::timeout(timeout, self.recv()).await.ok().flatten()
    }

    /// Take a task if one is ready, without waiting
    pub fn try_recv(&self) -> Option<Task> {
        let mut receiver = self.receiver.try_lock().ok()?;
        receiver.try_recv().ok()
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue").field("name", &self.name).finish()
    }
}

/// All queues of one engine, created on first use
#[derive(Default)]
pub struct TaskQueues {
    queues: RwLock<HashMap<String, TaskQueue>>,
}

impl TaskQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the named queue, creating it if needed
    pub fn get_or_create(&self, name: &str) -> TaskQueue {
        if let Some(queue) = self.queues.read().get(name) {
            return queue.clone();
        }
        self.queues
            .write()
            .entry(name.to_string())
            .or_insert_with(|| TaskQueue::new(name))
            .clone()
    }

    /// Enqueue a task on the queue it names
    pub fn send(&self, task: Task) -> Result<()> {
        self.get_or_create(&task.queue).send(task)
    }

    /// Names of every queue created so far
    pub fn names(&self) -> Vec<String> {
        self.queues.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for TaskQueues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueues")
            .field("queues", &self.names())
            .finish()
    }
}
