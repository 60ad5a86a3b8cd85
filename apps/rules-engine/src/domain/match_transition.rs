// apps/rules-engine/src/domain/match_transition.rs

use serde::{Deserialize, Serialize};

use crate::domain::match_state::{Match, MatchStatus};
use crate::domain::state::{Phase, PlayerId, SectorId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLifecycleView {
    pub version: i32,
    pub round_no: u8,
    pub phase: Phase,
    pub active_player: Option<PlayerId>,
    pub status: MatchStatus,
}

impl MatchLifecycleView {
    pub fn of(version: i32, m: &Match) -> Self {
        Self {
            version,
            round_no: m.round_no,
            phase: m.phase,
            active_player: m.active_player().cloned(),
            status: m.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchTransition {
    /// Edge-triggered: the turn became a specific player.
    TurnBecame { player_id: PlayerId },

    /// Edge-triggered: a new round began.
    RoundStarted { round_no: u8 },

    /// Edge-triggered: the match reached the end of its last round.
    MatchEnded,

    /// Explicit: every player passed.
    ActionPhaseCompleted { round_no: u8 },

    /// Explicit: the orchestrator entered a phase.
    PhaseEntered { round_no: u8, phase: Phase },

    /// Explicit: a contested sector was resolved.
    CombatResolved {
        sector_id: SectorId,
        winner: PlayerId,
    },
}

/// Summary handed to the caller after each mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSummary {
    pub phase: Phase,
    pub round_no: u8,
    pub active_player: Option<PlayerId>,
    pub action_phase_completed: bool,
}

impl TurnSummary {
    pub fn of(m: &Match, transitions: &[MatchTransition]) -> Self {
        Self {
            phase: m.phase,
            round_no: m.round_no,
            active_player: m.active_player().cloned(),
            action_phase_completed: transitions
                .iter()
                .any(|t| matches!(t, MatchTransition::ActionPhaseCompleted { .. })),
        }
    }
}

/// Derive edge-triggered transitions from before/after lifecycle state.
pub fn derive_match_transitions(
    before: &MatchLifecycleView,
    after: &MatchLifecycleView,
) -> Vec<MatchTransition> {
    let mut transitions = Vec::new();

    // 1. Round change
    if after.round_no > before.round_no {
        transitions.push(MatchTransition::RoundStarted {
            round_no: after.round_no,
        });
    }

    // 2. Turn change
    if let Some(player_id) = &after.active_player {
        if before.active_player.as_ref() != Some(player_id) || after.round_no != before.round_no
        {
            transitions.push(MatchTransition::TurnBecame {
                player_id: player_id.clone(),
            });
        }
    }

    // 3. Match end (!Finished -> Finished)
    if before.status != MatchStatus::Finished && after.status == MatchStatus::Finished {
        transitions.push(MatchTransition::MatchEnded);
    }

    transitions
}
