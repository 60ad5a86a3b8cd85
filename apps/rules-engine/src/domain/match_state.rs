//! Persisted match aggregate and the bridge to the ephemeral phase state.
//!
//! The stored `Match` keeps only what cannot be derived. Influence available
//! to spend is always re-read from the player's economy (`on_track`) when the
//! phase state is rebuilt, so there is a single source of truth for disks.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::actions::ActionKind;
use crate::domain::economy_types::PlayerEconomy;
use crate::domain::state::{Phase, PhaseState, PlayerActionState, PlayerId};
use crate::errors::domain::DomainError;

/// Default number of rounds in a match.
pub const DEFAULT_MAX_ROUNDS: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Active,
    /// Reached End of the last round; ready to archive.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub round_no: u8,
    pub max_rounds: u8,
    pub phase: Phase,
    pub status: MatchStatus,
    pub turn_order: Vec<PlayerId>,
    pub start_index: usize,
    pub current_player_index: usize,
    pub passed_players: Vec<PlayerId>,
    /// Passed players who already spent their reaction this round.
    pub reactions_used: BTreeSet<PlayerId>,
    pub actions_taken: BTreeMap<PlayerId, Vec<ActionKind>>,
}

impl Match {
    /// A brand-new match at round 1, Action phase, first seat to act.
    pub fn new(id: impl Into<String>, turn_order: Vec<PlayerId>, max_rounds: u8) -> Self {
        Self {
            id: id.into(),
            round_no: 1,
            max_rounds,
            phase: Phase::Action,
            status: MatchStatus::Active,
            turn_order,
            start_index: 0,
            current_player_index: 0,
            passed_players: Vec::new(),
            reactions_used: BTreeSet::new(),
            actions_taken: BTreeMap::new(),
        }
    }

    pub fn is_last_round(&self) -> bool {
        self.round_no >= self.max_rounds
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Player whose turn it is, if anyone can act.
    pub fn active_player(&self) -> Option<&PlayerId> {
        if self.phase != Phase::Action
            || self.is_finished()
            || self.passed_players.len() == self.turn_order.len()
        {
            return None;
        }
        self.turn_order.get(self.current_player_index)
    }

    pub fn is_seated(&self, player_id: &PlayerId) -> bool {
        self.turn_order.contains(player_id)
    }

    /// Rebuild the ephemeral phase state from this match and the economies.
    pub fn phase_state(
        &self,
        economies: &BTreeMap<PlayerId, PlayerEconomy>,
        max_influence: i32,
    ) -> Result<PhaseState, DomainError> {
        let mut players = BTreeMap::new();
        for player_id in &self.turn_order {
            let economy = economies.get(player_id).ok_or_else(|| {
                DomainError::invariant(format!(
                    "match {} has no economy for seated player {player_id}",
                    self.id
                ))
            })?;
            let passed = self.passed_players.contains(player_id);
            players.insert(
                player_id.clone(),
                PlayerActionState {
                    influence_available: economy.influence.on_track,
                    passed,
                    actions_taken: self.actions_taken.get(player_id).cloned().unwrap_or_default(),
                    can_react: passed && !self.reactions_used.contains(player_id),
                },
            );
        }

        Ok(PhaseState {
            round_no: self.round_no,
            phase: self.phase,
            turn_order: self.turn_order.clone(),
            start_index: self.start_index,
            current_player_index: self.current_player_index,
            all_players_passed: self.passed_players.len() == self.turn_order.len(),
            passed_players: self.passed_players.clone(),
            players,
            max_influence,
        })
    }

    /// Copy the durable parts of a phase state back into the match.
    pub fn absorb(&mut self, state: &PhaseState) {
        self.round_no = state.round_no;
        self.phase = state.phase;
        self.start_index = state.start_index;
        self.current_player_index = state.current_player_index;
        self.passed_players = state.passed_players.clone();
        self.reactions_used = state
            .players
            .iter()
            .filter(|(_, p)| p.passed && !p.can_react)
            .map(|(id, _)| id.clone())
            .collect();
        self.actions_taken = state
            .players
            .iter()
            .filter(|(_, p)| !p.actions_taken.is_empty())
            .map(|(id, p)| (id.clone(), p.actions_taken.clone()))
            .collect();
    }
}
