//! Persistent per-player economy snapshot.

use serde::{Deserialize, Serialize};

use crate::domain::resources::{Resource, ResourcePool};
use crate::domain::state::PlayerId;
use crate::domain::tables::{production_value, upkeep_cost, MAX_CUBES, STARTING_DISKS};

/// Default number of resources bought per unit when trading.
pub const DEFAULT_TRADE_RATIO: i32 = 2;
/// Colony ships a player starts with.
pub const STARTING_COLONY_SHIPS: i32 = 3;
/// Cubes left on each population track at match start (two deployed).
pub const STARTING_CUBES_REMAINING: i32 = 11;
/// Stored resources at match start.
pub const STARTING_RESOURCES: ResourcePool = ResourcePool::new(10, 5, 3);

/// One population track. Deploying a cube raises that resource's production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationTrack {
    /// Cubes still on the track, in `0..=13`.
    pub cubes_remaining: i32,
    /// Derived from the production table; recomputed on every move.
    pub production_value: i32,
}

impl PopulationTrack {
    pub fn with_remaining(cubes_remaining: i32) -> Self {
        Self {
            cubes_remaining,
            production_value: production_value(cubes_remaining),
        }
    }

    pub const fn cubes_deployed(&self) -> i32 {
        MAX_CUBES - self.cubes_remaining
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationTracks {
    pub money: PopulationTrack,
    pub science: PopulationTrack,
    pub materials: PopulationTrack,
}

impl PopulationTracks {
    pub fn uniform(cubes_remaining: i32) -> Self {
        let track = PopulationTrack::with_remaining(cubes_remaining);
        Self {
            money: track,
            science: track,
            materials: track,
        }
    }

    pub const fn get(&self, resource: Resource) -> &PopulationTrack {
        match resource {
            Resource::Money => &self.money,
            Resource::Science => &self.science,
            Resource::Materials => &self.materials,
        }
    }

    pub fn get_mut(&mut self, resource: Resource) -> &mut PopulationTrack {
        match resource {
            Resource::Money => &mut self.money,
            Resource::Science => &mut self.science,
            Resource::Materials => &mut self.materials,
        }
    }
}

/// Influence disks split across the track, spent actions and held sectors.
///
/// `on_track + on_actions + on_sectors == total_available` at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluenceTrack {
    pub on_track: i32,
    pub on_actions: i32,
    pub on_sectors: i32,
    pub total_available: i32,
    /// Derived from the upkeep table by `on_track`.
    pub upkeep_cost: i32,
}

impl InfluenceTrack {
    pub fn starting() -> Self {
        Self {
            on_track: STARTING_DISKS,
            on_actions: 0,
            on_sectors: 0,
            total_available: STARTING_DISKS,
            upkeep_cost: upkeep_cost(STARTING_DISKS),
        }
    }

    pub(crate) fn recompute_upkeep(&mut self) {
        self.upkeep_cost = upkeep_cost(self.on_track);
    }
}

/// Colony-ship pool; used ships only come back on an explicit refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonyShips {
    pub total: i32,
    pub available: i32,
    pub used: i32,
}

impl ColonyShips {
    pub const fn full(total: i32) -> Self {
        Self {
            total,
            available: total,
            used: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEconomy {
    pub player_id: PlayerId,
    pub resources: ResourcePool,
    pub population: PopulationTracks,
    pub influence: InfluenceTrack,
    pub colony_ships: ColonyShips,
    /// Resources paid per resource received when trading (faction-specific).
    pub trade_ratio: i32,
}

impl PlayerEconomy {
    /// Starting economy for a freshly seated player.
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            resources: STARTING_RESOURCES,
            population: PopulationTracks::uniform(STARTING_CUBES_REMAINING),
            influence: InfluenceTrack::starting(),
            colony_ships: ColonyShips::full(STARTING_COLONY_SHIPS),
            trade_ratio: DEFAULT_TRADE_RATIO,
        }
    }

    pub fn with_trade_ratio(mut self, trade_ratio: i32) -> Self {
        self.trade_ratio = trade_ratio;
        self
    }

    pub fn with_resources(mut self, resources: ResourcePool) -> Self {
        self.resources = resources;
        self
    }
}
