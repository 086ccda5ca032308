//! Activities - handler definitions and their execution context

pub mod context;
pub mod context_impl;
pub mod definition;

pub use context::ActivityContext;
pub use context_impl::ActivityContextImpl;
pub use definition::ActivityDefinition;
