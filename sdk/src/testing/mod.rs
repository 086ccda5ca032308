//! Testing utilities for activities and workflows.
//!
//! Enabled with the `testing` feature.

mod mock_activity_context;
mod test_environment;

pub use mock_activity_context::{MockActivityContext, MockActivityContextBuilder};
pub use test_environment::TestEnvironment;
