//! Phase state machine: turn order, action legality and phase cycling.
//!
//! Every function takes the current `PhaseState` by reference and returns a
//! new one; inputs are never mutated.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::actions::{ActionKind, ActionValidation};
use crate::domain::resources::ResourcePool;
use crate::domain::state::{rotate_index, Phase, PhaseState, PlayerActionState, PlayerId};
use crate::errors::domain::{DomainError, ValidationKind};

/// Influence a faction starts each round with unless configured otherwise.
pub const DEFAULT_MAX_INFLUENCE: i32 = 16;

/// Base income granted at the Income phase.
pub const BASE_INCOME: ResourcePool = ResourcePool::new(2, 1, 1);

/// Base income plus optional per-player multipliers (missing = 1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSchedule {
    pub base: ResourcePool,
    #[serde(default)]
    pub multipliers: BTreeMap<PlayerId, f64>,
}

impl Default for IncomeSchedule {
    fn default() -> Self {
        Self {
            base: BASE_INCOME,
            multipliers: BTreeMap::new(),
        }
    }
}

/// Largest per-player income multiplier a seat may be created with.
pub const MAX_INCOME_MULTIPLIER: f64 = 100.0;

/// Seat-time check for an income multiplier: finite and within
/// `0.0..=MAX_INCOME_MULTIPLIER`.
pub fn validate_income_multiplier(multiplier: f64) -> Result<(), DomainError> {
    if multiplier.is_finite() && (0.0..=MAX_INCOME_MULTIPLIER).contains(&multiplier) {
        return Ok(());
    }
    Err(DomainError::validation_other(format!(
        "Income multiplier must be within 0..={MAX_INCOME_MULTIPLIER}, got {multiplier}"
    )))
}

impl IncomeSchedule {
    /// Stored multiplier for `player_id` (1.0 when unset, negatives count as 0).
    fn multiplier(&self, player_id: &PlayerId) -> Result<f64, DomainError> {
        let m = self.multipliers.get(player_id).copied().unwrap_or(1.0);
        if !m.is_finite() {
            return Err(DomainError::invariant(format!(
                "income multiplier for {player_id} is not finite ({m})"
            )));
        }
        Ok(m.max(0.0))
    }
}

/// `base × multiplier` truncated toward zero, added to `stored` without overflow.
fn credit_income(
    stored: i32,
    base: i32,
    multiplier: f64,
    player_id: &PlayerId,
) -> Result<i32, DomainError> {
    let overflow =
        || DomainError::invariant(format!("income for {player_id} overflowed a resource counter"));
    let scaled = (f64::from(base) * multiplier).trunc();
    if scaled < f64::from(i32::MIN) || scaled > f64::from(i32::MAX) {
        return Err(overflow());
    }
    stored.checked_add(scaled as i32).ok_or_else(overflow)
}

pub fn initialize(
    player_ids: &[PlayerId],
    round_no: u8,
    start_index: usize,
) -> Result<PhaseState, DomainError> {
    initialize_with_influence(player_ids, round_no, start_index, DEFAULT_MAX_INFLUENCE)
}

/// Fresh Action-phase state: nobody passed, influence at the faction maximum.
pub fn initialize_with_influence(
    player_ids: &[PlayerId],
    round_no: u8,
    start_index: usize,
    max_influence: i32,
) -> Result<PhaseState, DomainError> {
    if player_ids.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayers,
            "A match needs at least one player",
        ));
    }
    let unique: BTreeSet<&PlayerId> = player_ids.iter().collect();
    if unique.len() != player_ids.len() {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayers,
            "Player ids must be unique",
        ));
    }

    let start_index = start_index % player_ids.len();
    Ok(PhaseState {
        round_no,
        phase: Phase::Action,
        turn_order: player_ids.to_vec(),
        start_index,
        current_player_index: start_index,
        passed_players: Vec::new(),
        all_players_passed: false,
        players: player_ids
            .iter()
            .map(|id| (id.clone(), PlayerActionState::fresh(max_influence)))
            .collect(),
        max_influence,
    })
}

/// Check whether `player_id` may take `kind` right now. Never mutates.
pub fn validate_action(
    state: &PhaseState,
    player_id: &PlayerId,
    kind: ActionKind,
) -> ActionValidation {
    let Some(player) = state.player(player_id) else {
        return ActionValidation::rejected(
            ValidationKind::Other("UNKNOWN_PLAYER".into()),
            format!("Unknown player {player_id}"),
        );
    };

    if state.phase != Phase::Action {
        return ActionValidation::rejected(
            ValidationKind::PhaseMismatch,
            format!("Actions are only allowed in the action phase (now {})", state.phase),
        );
    }

    if player.passed {
        if kind.is_pass() {
            return ActionValidation::rejected(
                ValidationKind::AlreadyPassed,
                "You have already passed this round",
            );
        }
        if !player.can_react {
            return ActionValidation::rejected(
                ValidationKind::AlreadyPassed,
                "You have passed and already used your reaction",
            );
        }
    } else if kind.is_pass() {
        // Passing is legal out of turn and leaves the pointer where it is.
        return ActionValidation::ok();
    } else if state.active_player() != Some(player_id) {
        return ActionValidation::rejected(ValidationKind::OutOfTurn, "Not your turn");
    }

    let cost = kind.influence_cost();
    if cost > player.influence_available {
        return ActionValidation::rejected(
            ValidationKind::InsufficientInfluence,
            format!(
                "{kind} needs {cost} influence, {} available",
                player.influence_available
            ),
        );
    }

    ActionValidation::ok()
}

/// Apply a validated action and move the turn pointer.
///
/// Executing an action that `validate_action` rejects is a contract breach
/// and fails with an invariant error.
pub fn execute_action(
    state: &PhaseState,
    player_id: &PlayerId,
    kind: ActionKind,
) -> Result<PhaseState, DomainError> {
    let validation = validate_action(state, player_id, kind);
    if !validation.valid {
        return Err(DomainError::invariant(format!(
            "execute_action called with an illegal {kind} by {player_id}: {}",
            validation.reason.unwrap_or_default()
        )));
    }

    let mut next = state.clone();
    let held_turn = state.active_player() == Some(player_id);
    let player = next
        .players
        .get_mut(player_id)
        .ok_or_else(|| DomainError::invariant(format!("player {player_id} vanished")))?;

    if kind.is_pass() {
        player.passed = true;
        player.can_react = true;
        next.passed_players.push(player_id.clone());
        next.all_players_passed = next.passed_players.len() == next.turn_order.len();
    } else {
        player.influence_available -= kind.influence_cost();
        player.actions_taken.push(kind);
        if player.passed {
            player.can_react = false;
        }
    }

    // Only the turn holder moves the pointer. A post-pass reaction and an
    // early pass are both legal out of turn, and neither consumes the
    // active player's turn.
    if held_turn && !next.all_players_passed {
        if let Some(idx) = next.next_unpassed_after(next.current_player_index) {
            next.current_player_index = idx;
        }
    }

    Ok(next)
}

/// Move to the next phase; leaving End starts a new round.
pub fn advance_phase(state: &PhaseState) -> PhaseState {
    let next_phase = state.phase.next();
    debug!(
        round_no = state.round_no,
        from = %state.phase,
        to = %next_phase,
        "Phase transition"
    );

    if state.phase == Phase::End {
        let seats = state.turn_order.len().max(1);
        let start_index = rotate_index(state.start_index, 1, seats);
        let mut fresh = state.clone();
        fresh.round_no = state.round_no.saturating_add(1);
        fresh.phase = Phase::Action;
        fresh.start_index = start_index;
        fresh.current_player_index = start_index;
        reset_round_fields(&mut fresh);
        return fresh;
    }

    let mut next = state.clone();
    next.phase = next_phase;
    next
}

pub fn is_action_phase_complete(state: &PhaseState) -> bool {
    state.phase == Phase::Action && state.all_players_passed
}

/// Reset influence to the maximum and clear per-round flags. Idempotent.
pub fn process_upkeep(state: &PhaseState) -> PhaseState {
    let mut next = state.clone();
    reset_round_fields(&mut next);
    next
}

/// Add base income (scaled per player, truncated toward zero) to each snapshot.
///
/// A credit that would overflow a counter is an invariant error; no snapshot
/// is returned partially updated.
pub fn process_income(
    state: &PhaseState,
    snapshots: &BTreeMap<PlayerId, ResourcePool>,
    schedule: &IncomeSchedule,
) -> Result<BTreeMap<PlayerId, ResourcePool>, DomainError> {
    snapshots
        .iter()
        .map(|(player_id, pool)| {
            if !state.players.contains_key(player_id) {
                return Ok((player_id.clone(), *pool));
            }
            let m = schedule.multiplier(player_id)?;
            let base = schedule.base;
            let next = ResourcePool {
                money: credit_income(pool.money, base.money, m, player_id)?,
                science: credit_income(pool.science, base.science, m, player_id)?,
                materials: credit_income(pool.materials, base.materials, m, player_id)?,
            };
            Ok((player_id.clone(), next))
        })
        .collect()
}

fn reset_round_fields(state: &mut PhaseState) {
    let max_influence = state.max_influence;
    for player in state.players.values_mut() {
        *player = PlayerActionState::fresh(max_influence);
    }
    state.passed_players.clear();
    state.all_players_passed = false;
}
