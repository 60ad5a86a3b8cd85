use std::collections::BTreeMap;

use crate::domain::phase_machine::{
    advance_phase, execute_action, initialize, initialize_with_influence,
    is_action_phase_complete, process_income, process_upkeep, validate_action,
    validate_income_multiplier, IncomeSchedule, MAX_INCOME_MULTIPLIER,
};
use crate::domain::{ActionKind, Phase, PhaseState, PlayerId, ResourcePool};
use crate::errors::domain::{DomainError, ValidationKind};

fn pid(s: &str) -> PlayerId {
    PlayerId::from(s)
}

fn two_players() -> PhaseState {
    initialize(&[pid("p1"), pid("p2")], 1, 0).unwrap()
}

fn three_players() -> PhaseState {
    initialize(&[pid("p1"), pid("p2"), pid("p3")], 1, 0).unwrap()
}

fn act(state: &PhaseState, player: &str, kind: ActionKind) -> PhaseState {
    execute_action(state, &pid(player), kind).unwrap()
}

#[test]
fn initialize_starts_in_action_phase() {
    let state = two_players();
    assert_eq!(state.phase, Phase::Action);
    assert_eq!(state.round_no, 1);
    assert_eq!(state.current_player_index, 0);
    assert_eq!(state.active_player(), Some(&pid("p1")));
    for player in state.players.values() {
        assert_eq!(player.influence_available, 16);
        assert!(!player.passed);
        assert!(!player.can_react);
    }
    assert!(state.passed_players.is_empty());
}

#[test]
fn initialize_rejects_empty_and_duplicate_players() {
    match initialize(&[], 1, 0).unwrap_err() {
        DomainError::Validation(kind, _) => assert_eq!(kind, ValidationKind::InvalidPlayers),
        other => panic!("unexpected {other:?}"),
    }
    assert!(initialize(&[pid("p1"), pid("p1")], 1, 0).is_err());
}

#[test]
fn start_index_wraps_around_the_table() {
    let state = initialize(&[pid("p1"), pid("p2"), pid("p3")], 1, 4).unwrap();
    assert_eq!(state.start_index, 1);
    assert_eq!(state.active_player(), Some(&pid("p2")));
}

#[test]
fn paid_action_deducts_influence_and_advances() {
    let state = act(&two_players(), "p1", ActionKind::Explore);
    let p1 = state.player(&pid("p1")).unwrap();
    assert_eq!(p1.influence_available, 15);
    assert_eq!(p1.actions_taken, vec![ActionKind::Explore]);
    assert_eq!(state.active_player(), Some(&pid("p2")));
}

#[test]
fn out_of_turn_action_is_rejected() {
    let state = two_players();
    let v = validate_action(&state, &pid("p2"), ActionKind::Build);
    assert!(!v.valid);
    assert_eq!(v.kind, Some(ValidationKind::OutOfTurn));
    assert!(v.reason.is_some());
}

#[test]
fn out_of_turn_pass_keeps_the_pointer() {
    let s = act(&three_players(), "p3", ActionKind::Pass);
    assert_eq!(s.passed_players, vec![pid("p3")]);
    assert_eq!(s.active_player(), Some(&pid("p1")));

    // p3 is skipped from now on
    let s = act(&s, "p1", ActionKind::Research);
    assert_eq!(s.active_player(), Some(&pid("p2")));
    let s = act(&s, "p2", ActionKind::Research);
    assert_eq!(s.active_player(), Some(&pid("p1")));
}

#[test]
fn unknown_player_is_rejected() {
    let v = validate_action(&two_players(), &pid("ghost"), ActionKind::Pass);
    assert!(!v.valid);
}

#[test]
fn actions_outside_action_phase_are_rejected() {
    let state = advance_phase(&two_players());
    assert_eq!(state.phase, Phase::Combat);
    let v = validate_action(&state, &pid("p1"), ActionKind::Pass);
    assert_eq!(v.kind, Some(ValidationKind::PhaseMismatch));
}

#[test]
fn insufficient_influence_is_rejected_but_pass_is_free() {
    let state = initialize_with_influence(&[pid("p1"), pid("p2")], 1, 0, 0).unwrap();
    let v = validate_action(&state, &pid("p1"), ActionKind::Research);
    assert_eq!(v.kind, Some(ValidationKind::InsufficientInfluence));
    assert!(validate_action(&state, &pid("p1"), ActionKind::Pass).valid);
}

#[test]
fn executing_an_illegal_action_breaks_the_contract() {
    let err = execute_action(&two_players(), &pid("p2"), ActionKind::Move).unwrap_err();
    assert!(matches!(err, DomainError::Invariant(_)));
}

#[test]
fn pass_grants_exactly_one_reaction() {
    let s = act(&three_players(), "p1", ActionKind::Pass);
    assert!(s.player(&pid("p1")).unwrap().can_react);
    assert_eq!(s.active_player(), Some(&pid("p2")));

    // Reaction is taken out of turn and leaves the pointer alone.
    let s = act(&s, "p1", ActionKind::Upgrade);
    let p1 = s.player(&pid("p1")).unwrap();
    assert!(!p1.can_react);
    assert_eq!(p1.influence_available, 15);
    assert_eq!(s.active_player(), Some(&pid("p2")));

    let second = validate_action(&s, &pid("p1"), ActionKind::Upgrade);
    assert_eq!(second.kind, Some(ValidationKind::AlreadyPassed));
    let repass = validate_action(&s, &pid("p1"), ActionKind::Pass);
    assert_eq!(repass.kind, Some(ValidationKind::AlreadyPassed));
}

#[test]
fn turn_skips_passed_players() {
    let s = three_players();
    let s = act(&s, "p1", ActionKind::Build);
    let s = act(&s, "p2", ActionKind::Pass);
    let s = act(&s, "p3", ActionKind::Explore);
    assert_eq!(s.active_player(), Some(&pid("p1")));
    let s = act(&s, "p1", ActionKind::Move);
    assert_eq!(s.active_player(), Some(&pid("p3")));
}

#[test]
fn all_passing_completes_the_action_phase() {
    let s = act(&two_players(), "p1", ActionKind::Pass);
    assert!(!is_action_phase_complete(&s));
    let s = act(&s, "p2", ActionKind::Pass);
    assert!(s.all_players_passed);
    assert!(is_action_phase_complete(&s));
    assert_eq!(s.passed_players, vec![pid("p1"), pid("p2")]);
    assert_eq!(s.active_player(), None);
}

#[test]
fn full_cycle_starts_next_round_with_rotated_start() {
    let mut s = act(&two_players(), "p1", ActionKind::Research);
    s = act(&s, "p2", ActionKind::Pass);
    s = act(&s, "p1", ActionKind::Pass);

    let expected = [
        Phase::Combat,
        Phase::Upkeep,
        Phase::Income,
        Phase::Cleanup,
        Phase::End,
        Phase::Action,
    ];
    for phase in expected {
        s = advance_phase(&s);
        assert_eq!(s.phase, phase);
    }

    assert_eq!(s.round_no, 2);
    assert_eq!(s.start_index, 1);
    assert_eq!(s.active_player(), Some(&pid("p2")));
    assert!(s.passed_players.is_empty());
    assert!(!s.all_players_passed);
    for player in s.players.values() {
        assert_eq!(player.influence_available, 16);
        assert!(player.actions_taken.is_empty());
    }
}

#[test]
fn upkeep_resets_round_state_and_is_idempotent() {
    let mut s = act(&two_players(), "p1", ActionKind::Build);
    s = act(&s, "p2", ActionKind::Pass);
    s = advance_phase(&advance_phase(&s));
    assert_eq!(s.phase, Phase::Upkeep);

    let once = process_upkeep(&s);
    let twice = process_upkeep(&once);
    assert_eq!(once, twice);
    assert!(once.passed_players.is_empty());
    assert_eq!(once.player(&pid("p1")).unwrap().influence_available, 16);
    assert_eq!(once.phase, Phase::Upkeep);
}

#[test]
fn income_scales_and_truncates_without_mutating_input() {
    let s = two_players();
    let mut snapshots = BTreeMap::new();
    snapshots.insert(pid("p1"), ResourcePool::new(0, 0, 0));
    snapshots.insert(pid("p2"), ResourcePool::new(5, 5, 5));
    snapshots.insert(pid("observer"), ResourcePool::new(1, 1, 1));
    let before = snapshots.clone();

    let mut schedule = IncomeSchedule::default();
    schedule.multipliers.insert(pid("p2"), 1.5);

    let result = process_income(&s, &snapshots, &schedule).unwrap();
    assert_eq!(snapshots, before);
    assert_eq!(result[&pid("p1")], ResourcePool::new(2, 1, 1));
    // 2 * 1.5 = 3, 1 * 1.5 = 1.5 -> 1
    assert_eq!(result[&pid("p2")], ResourcePool::new(8, 6, 6));
    assert_eq!(result[&pid("observer")], ResourcePool::new(1, 1, 1));
}

#[test]
fn negative_multiplier_grants_nothing() {
    let s = two_players();
    let snapshots = BTreeMap::from([(pid("p1"), ResourcePool::new(4, 4, 4))]);
    let mut schedule = IncomeSchedule::default();
    schedule.multipliers.insert(pid("p1"), -2.0);

    let result = process_income(&s, &snapshots, &schedule).unwrap();
    assert_eq!(result[&pid("p1")], ResourcePool::new(4, 4, 4));
}

#[test]
fn income_overflow_is_an_invariant_breach() {
    let s = two_players();
    let snapshots = BTreeMap::from([(pid("p1"), ResourcePool::new(0, 0, 0))]);
    let mut schedule = IncomeSchedule::default();
    schedule.multipliers.insert(pid("p1"), 1e10);

    let err = process_income(&s, &snapshots, &schedule).unwrap_err();
    assert!(matches!(err, DomainError::Invariant(_)));

    // Near the ceiling a normal credit still overflows
    let snapshots = BTreeMap::from([(pid("p1"), ResourcePool::new(i32::MAX - 1, 0, 0))]);
    let err = process_income(&s, &snapshots, &IncomeSchedule::default()).unwrap_err();
    assert!(matches!(err, DomainError::Invariant(_)));

    schedule.multipliers.insert(pid("p1"), f64::NAN);
    let snapshots = BTreeMap::from([(pid("p1"), ResourcePool::new(0, 0, 0))]);
    assert!(process_income(&s, &snapshots, &schedule).is_err());
}

#[test]
fn income_multiplier_bounds() {
    assert!(validate_income_multiplier(0.0).is_ok());
    assert!(validate_income_multiplier(MAX_INCOME_MULTIPLIER).is_ok());
    for bad in [-0.5, MAX_INCOME_MULTIPLIER + 1.0, 1e10, f64::NAN, f64::INFINITY] {
        let err = validate_income_multiplier(bad).unwrap_err();
        assert!(err.is_rule_violation(), "{bad} should be a rule violation");
    }
}
