//! Property-based tests for the phase state machine.

use proptest::prelude::*;

use crate::domain::phase_machine::{
    execute_action, initialize, is_action_phase_complete, validate_action,
};
use crate::domain::test_gens::{paid_action, player_ids, players_and_pass_order};
use crate::domain::{test_prelude, ActionKind, PlayerId};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: All-pass termination
    /// Players pass in the generated order; whoever is active before their
    /// pass comes up takes a paid action instead. Every seat acts at most
    /// N-1 times between passes, so influence never runs out.
    #[test]
    fn prop_all_pass_terminates(
        (ids, pass_order) in players_and_pass_order(),
        action in paid_action(),
    ) {
        let mut state = initialize(&ids, 1, 0).unwrap();
        let mut next_to_pass = 0;

        for _ in 0..(ids.len() * ids.len() + ids.len()) {
            if state.all_players_passed {
                break;
            }
            let active: PlayerId = state.active_player().cloned().unwrap();
            // Invariant: the active index points at a non-passed player.
            prop_assert!(!state.has_passed(&active));

            let kind = if pass_order[next_to_pass] == active {
                next_to_pass += 1;
                ActionKind::Pass
            } else {
                action
            };
            prop_assert!(validate_action(&state, &active, kind).valid);
            state = execute_action(&state, &active, kind).unwrap();
        }

        prop_assert!(state.all_players_passed);
        prop_assert!(is_action_phase_complete(&state));
        prop_assert_eq!(&state.passed_players, &pass_order);
        prop_assert!(state.active_player().is_none());
    }

    /// Property: All-pass termination, any order
    /// Passing is legal out of turn; the pointer never rests on a passed seat.
    #[test]
    fn prop_all_pass_in_any_order_terminates(
        (ids, pass_order) in players_and_pass_order(),
    ) {
        let mut state = initialize(&ids, 1, 0).unwrap();
        for id in &pass_order {
            prop_assert!(validate_action(&state, id, ActionKind::Pass).valid);
            state = execute_action(&state, id, ActionKind::Pass).unwrap();
            if let Some(active) = state.active_player() {
                prop_assert!(!state.has_passed(active));
            }
        }
        prop_assert!(is_action_phase_complete(&state));
        prop_assert_eq!(&state.passed_players, &pass_order);
    }

    /// Property: Read-only validation
    /// Repeated validate_action calls never change the state.
    #[test]
    fn prop_validation_is_read_only(
        ids in player_ids(),
        action in paid_action(),
        start in 0usize..6,
    ) {
        let state = initialize(&ids, 1, start).unwrap();
        let snapshot = state.clone();
        for id in &ids {
            let first = validate_action(&state, id, action);
            let second = validate_action(&state, id, action);
            prop_assert_eq!(first, second);
            let _ = validate_action(&state, id, ActionKind::Pass);
        }
        prop_assert_eq!(state, snapshot);
    }
}
