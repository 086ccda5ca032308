//! Completion tokens: issuing, resolving and the public completion API

pub mod client;
pub mod registry;

pub use client::ActivityCompletionClient;
pub use registry::{CompletionRegistry, Outcome, PendingInvocation};
