//! Property-based tests for the task queue registry
//!
//! These tests use proptest to verify registration invariants

use courier_sdk::error::CourierError;
use courier_sdk::registry::{BoxedActivityFn, HandlerMetadata, RegisteredActivity};
use courier_sdk::TaskQueueRegistry;
use proptest::prelude::*;
use std::collections::HashMap;

fn echo() -> BoxedActivityFn {
    Box::new(|_ctx, input| Box::pin(async move { Ok(input) }))
}

fn versioned(name: &str, version: u32) -> RegisteredActivity {
    RegisteredActivity::new(
        HandlerMetadata {
            name: name.to_string(),
            description: Some(format!("v{}", version)),
        },
        echo(),
    )
}

/// Registrations over a small key space so that overwrites happen often
fn arb_registrations() -> impl Strategy<Value = Vec<(String, String, u32)>> {
    prop::collection::vec(("q[0-2]", "[ab][0-2]", any::<u32>()), 1..40)
}

proptest! {
    /// Property: lookup after register returns the most recent handler for the pair
    #[test]
    fn last_registration_wins(registrations in arb_registrations()) {
        let registry = TaskQueueRegistry::new();
        let mut expected = HashMap::new();

        for (queue, name, version) in &registrations {
            registry.register_activity_raw(queue, versioned(name, *version));
            expected.insert((queue.clone(), name.clone()), *version);
        }

        for ((queue, name), version) in &expected {
            let found = registry.lookup_activity(queue, name);
            prop_assert!(found.is_ok(), "{}/{} should be registered", queue, name);
            let found = found.unwrap();
            prop_assert_eq!(&found.metadata.name, name);
            let expected_description = format!("v{}", version);
            prop_assert_eq!(found.metadata.description.as_deref(), Some(expected_description.as_str()));
        }
    }

    /// Property: each queue lists exactly the distinct names registered on it
    #[test]
    fn names_are_distinct_per_queue(registrations in arb_registrations()) {
        let registry = TaskQueueRegistry::new();
        let mut expected: HashMap<String, Vec<String>> = HashMap::new();

        for (queue, name, version) in &registrations {
            registry.register_activity_raw(queue, versioned(name, *version));
            let names = expected.entry(queue.clone()).or_default();
            if !names.contains(name) {
                names.push(name.clone());
            }
        }

        for (queue, mut names) in expected {
            names.sort();
            prop_assert_eq!(registry.activity_names(&queue), names);
        }
    }

    /// Property: an unregistered pair is NotFound and names its queue and handler
    #[test]
    fn unregistered_pair_is_not_found(registrations in arb_registrations(), queue in "q[0-2]") {
        let registry = TaskQueueRegistry::new();
        for (q, name, version) in &registrations {
            registry.register_activity_raw(q, versioned(name, *version));
        }

        match registry.lookup_activity(&queue, "never-registered") {
            Err(CourierError::NotFound { queue: q, name }) => {
                prop_assert_eq!(&q, &queue);
                prop_assert_eq!(name, "never-registered");
            }
            other => prop_assert!(false, "expected NotFound, got {:?}", other),
        }
        prop_assert!(registry.lookup_workflow(&queue, "never-registered").is_err());
    }
}
