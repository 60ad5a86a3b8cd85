use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::actions::ActionKind;
use crate::errors::domain::DomainError;

/// Stable identifier of a seated player.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a map sector (hex) that fleets and influence disks occupy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectorId(String);

impl SectorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Phases of a round, in their fixed cyclic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Players take actions in turn order until everyone has passed.
    Action,
    /// Contested sectors are resolved.
    Combat,
    /// Production and upkeep are recomputed.
    Upkeep,
    /// Income is applied to the resource pools.
    Income,
    /// Action disks return to the track, colony ships refresh.
    Cleanup,
    /// Round boundary; terminal on the last round.
    End,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Action,
        Phase::Combat,
        Phase::Upkeep,
        Phase::Income,
        Phase::Cleanup,
        Phase::End,
    ];

    /// Next phase in cyclic order (End wraps to Action).
    pub const fn next(self) -> Phase {
        match self {
            Phase::Action => Phase::Combat,
            Phase::Combat => Phase::Upkeep,
            Phase::Upkeep => Phase::Income,
            Phase::Income => Phase::Cleanup,
            Phase::Cleanup => Phase::End,
            Phase::End => Phase::Action,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Action => "action",
            Phase::Combat => "combat",
            Phase::Upkeep => "upkeep",
            Phase::Income => "income",
            Phase::Cleanup => "cleanup",
            Phase::End => "end",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-player, per-round action bookkeeping.
///
/// Never stored on its own: it is rebuilt from the persisted match and
/// economy whenever the orchestrator needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerActionState {
    /// Influence disks that can still pay for actions this round.
    pub influence_available: i32,
    pub passed: bool,
    /// Actions taken this round, in order.
    pub actions_taken: Vec<ActionKind>,
    /// One reaction is granted right after passing and consumed on use.
    pub can_react: bool,
}

impl PlayerActionState {
    pub fn fresh(influence_available: i32) -> Self {
        Self {
            influence_available,
            passed: false,
            actions_taken: Vec::new(),
            can_react: false,
        }
    }
}

/// Phase state machine snapshot for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseState {
    /// 1-based round number.
    pub round_no: u8,
    pub phase: Phase,
    /// Seating order; never changes during a match.
    pub turn_order: Vec<PlayerId>,
    /// Index into `turn_order` of the player who starts this round.
    pub start_index: usize,
    /// Index into `turn_order` of the player whose turn it is.
    pub current_player_index: usize,
    /// Players in the order they passed this round.
    pub passed_players: Vec<PlayerId>,
    pub all_players_passed: bool,
    pub players: BTreeMap<PlayerId, PlayerActionState>,
    /// Faction maximum that influence resets to.
    pub max_influence: i32,
}

impl PhaseState {
    /// Player whose turn it is; `None` once everybody has passed.
    pub fn active_player(&self) -> Option<&PlayerId> {
        if self.all_players_passed {
            return None;
        }
        self.turn_order.get(self.current_player_index)
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&PlayerActionState> {
        self.players.get(player_id)
    }

    pub fn has_passed(&self, player_id: &PlayerId) -> bool {
        self.players.get(player_id).is_some_and(|p| p.passed)
    }

    /// Index of the next non-passed player strictly after `from`, wrapping.
    pub fn next_unpassed_after(&self, from: usize) -> Option<usize> {
        let n = self.turn_order.len();
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|&idx| !self.has_passed(&self.turn_order[idx]))
    }
}

/// Seat rotation helper: index `steps` positions after `start`, wrapping.
#[inline]
pub fn rotate_index(start: usize, steps: usize, seats: usize) -> usize {
    debug_assert!(seats > 0, "seats must be non-zero");
    (start + steps) % seats
}

pub fn require_player<'a>(
    state: &'a PhaseState,
    player_id: &PlayerId,
) -> Result<&'a PlayerActionState, DomainError> {
    state.players.get(player_id).ok_or_else(|| {
        DomainError::not_found(
            crate::errors::domain::NotFoundKind::Player,
            format!("Player {player_id} is not seated in this match"),
        )
    })
}
