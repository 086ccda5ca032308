//! Workers - dispatch loops bound to task queues

pub(crate) mod dispatch;
pub mod factory;
pub(crate) mod metrics;
pub mod queue_worker;

pub use factory::WorkerFactory;
pub use queue_worker::{Worker, WorkerHandle};
