//! Combat resolver contract and sector bookkeeping.
//!
//! The resolver is an external collaborator: only its seed/input/output
//! contract lives here. Implementations must be deterministic, so an identical
//! seed and identical fleets always yield an identical outcome.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::state::{PlayerId, SectorId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    /// Dice rolled per volley.
    pub dice: u8,
    /// Hull damage per hit.
    pub damage: u8,
}

/// Fleet element exchanged with the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipSnapshot {
    pub initiative: u8,
    pub hull: i32,
    pub hull_capacity: i32,
    pub alive: bool,
    pub weapons: Vec<Weapon>,
    /// Shield tier subtracted from attack rolls.
    pub shield: u8,
}

impl ShipSnapshot {
    pub fn new(initiative: u8, hull_capacity: i32, weapons: Vec<Weapon>, shield: u8) -> Self {
        Self {
            initiative,
            hull: hull_capacity,
            hull_capacity,
            alive: true,
            weapons,
            shield,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub winner: PlayerId,
    pub round_log: Vec<String>,
    pub final_fleet_a: Vec<ShipSnapshot>,
    pub final_fleet_b: Vec<ShipSnapshot>,
}

pub trait CombatResolver: Send + Sync {
    fn simulate(
        &self,
        seed: u64,
        player_a: &PlayerId,
        player_b: &PlayerId,
        fleet_a: &[ShipSnapshot],
        fleet_b: &[ShipSnapshot],
    ) -> CombatOutcome;
}

/// A map sector with its controller and the fleets inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub id: SectorId,
    /// Player holding an influence disk here.
    pub controller: Option<PlayerId>,
    pub fleets: BTreeMap<PlayerId, Vec<ShipSnapshot>>,
}

impl Sector {
    pub fn new(id: SectorId) -> Self {
        Self {
            id,
            controller: None,
            fleets: BTreeMap::new(),
        }
    }

    /// Players with at least one live ship, in turn order.
    pub fn combatants(&self, turn_order: &[PlayerId]) -> Vec<PlayerId> {
        turn_order
            .iter()
            .filter(|id| {
                self.fleets
                    .get(*id)
                    .is_some_and(|ships| ships.iter().any(|s| s.alive))
            })
            .cloned()
            .collect()
    }

    pub fn is_contested(&self, turn_order: &[PlayerId]) -> bool {
        self.combatants(turn_order).len() >= 2
    }
}

/// Audit record of one resolved battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatReport {
    pub sector_id: SectorId,
    pub seed_key: String,
    pub seed: u64,
    pub player_a: PlayerId,
    pub player_b: PlayerId,
    pub winner: PlayerId,
    pub round_log: Vec<String>,
}
