//! Core types for worker lifecycle management.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Current operational status of a worker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkerStatus {
    /// Worker is built but not polling yet.
    #[default]
    Initializing,

    /// Worker's dispatch loops are polling.
    Running {
        /// When the worker started running.
        started_at: SystemTime,
        /// Number of dispatch loops.
        loops: usize,
    },

    /// Worker stopped accepting new tasks and drains in-flight ones.
    ShuttingDown {
        /// When shutdown was requested.
        requested_at: SystemTime,
    },

    /// Worker has stopped.
    Stopped {
        /// When the worker stopped.
        stopped_at: SystemTime,
        /// Reason for stopping.
        reason: StopReason,
    },
}

impl WorkerStatus {
    /// Returns true if the worker is polling for work.
    pub fn is_running(&self) -> bool {
        matches!(self, WorkerStatus::Running { .. })
    }

    /// Returns true if the worker has stopped.
    pub fn is_stopped(&self) -> bool {
        matches!(self, WorkerStatus::Stopped { .. })
    }
}

/// Reason for worker stopping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Shutdown requested and in-flight work drained.
    Graceful,
    /// The grace period elapsed with work still in flight.
    GraceExpired,
}

/// Per-loop dispatch state.
///
/// A loop cycles `Idle -> Polling -> Executing -> (Completed | Deferred) -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispatchState {
    Idle,
    Polling,
    Executing,
    Completed,
    Deferred,
}

impl DispatchState {
    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(self, next: DispatchState) -> bool {
        use DispatchState::*;
        matches!(
            (self, next),
            (Idle, Polling)
                | (Polling, Executing)
                | (Polling, Idle)
                | (Executing, Completed)
                | (Executing, Deferred)
                | (Completed, Idle)
                | (Deferred, Idle)
        )
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DispatchState::Idle => "idle",
            DispatchState::Polling => "polling",
            DispatchState::Executing => "executing",
            DispatchState::Completed => "completed",
            DispatchState::Deferred => "deferred",
        };
        f.write_str(s)
    }
}
