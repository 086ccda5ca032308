//! Client surface: the engine handle and workflow starting

pub mod builder;
pub mod courier;
pub mod workflow_client;

pub use builder::CourierBuilder;
pub use courier::Courier;
pub use workflow_client::{WorkflowClient, WorkflowHandle, WorkflowOptions};
