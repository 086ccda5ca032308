//! Property-based tests for dispatch state machine validation
//!
//! These tests use proptest to verify state machine invariants

use courier_sdk::DispatchState;
use proptest::prelude::*;

const STATES: [DispatchState; 5] = [
    DispatchState::Idle,
    DispatchState::Polling,
    DispatchState::Executing,
    DispatchState::Completed,
    DispatchState::Deferred,
];

fn successors(state: DispatchState) -> Vec<DispatchState> {
    STATES
        .iter()
        .copied()
        .filter(|next| state.can_transition_to(*next))
        .collect()
}

proptest! {
    /// Property: a legal walk from Idle only executes straight after polling
    /// and only returns to Idle from Polling, Completed or Deferred
    #[test]
    fn legal_walks_follow_the_cycle(choices in prop::collection::vec(any::<prop::sample::Index>(), 1..50)) {
        let mut state = DispatchState::Idle;
        for choice in choices {
            let next_states = successors(state);
            prop_assert!(!next_states.is_empty(), "{} has no successor", state);
            let next = next_states[choice.index(next_states.len())];

            if next == DispatchState::Executing {
                prop_assert_eq!(state, DispatchState::Polling);
            }
            if next == DispatchState::Idle {
                prop_assert!(matches!(
                    state,
                    DispatchState::Polling | DispatchState::Completed | DispatchState::Deferred
                ));
            }
            state = next;
        }
    }

    /// Property: no state transitions to itself
    #[test]
    fn no_self_transitions(index in 0usize..5) {
        let state = STATES[index];
        prop_assert!(!state.can_transition_to(state));
    }
}
