//! Worker module - lifecycle status, dispatch states and metrics

pub mod lifecycle;
pub mod metrics;

pub use lifecycle::{DispatchState, StopReason, WorkerStatus};
pub use metrics::WorkerMetrics;
