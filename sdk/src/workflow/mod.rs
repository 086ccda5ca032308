//! Workflows - definitions, their context and the fan-out coordinator

pub mod combinators;
pub mod context;
pub mod definition;
pub mod future;

pub use combinators::{join, join2, join_all, spawn, Join};
pub use context::WorkflowContext;
pub use definition::WorkflowDefinition;
pub use future::FanOutFuture;
