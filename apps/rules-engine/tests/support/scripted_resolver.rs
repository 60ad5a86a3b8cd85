//! Combat resolver with a fixed verdict, for control-transfer tests.

use std::sync::Mutex;

use rules_engine::domain::CombatOutcome;
use rules_engine::{CombatResolver, PlayerId, ShipSnapshot};

/// Always declares `winner` the victor and sinks the other fleet.
/// Records every seed it was called with.
pub struct ScriptedResolver {
    pub winner: PlayerId,
    pub seeds: Mutex<Vec<u64>>,
}

impl ScriptedResolver {
    pub fn new(winner: PlayerId) -> Self {
        Self {
            winner,
            seeds: Mutex::new(Vec::new()),
        }
    }

    pub fn seeds(&self) -> Vec<u64> {
        self.seeds.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

fn sunk(fleet: &[ShipSnapshot]) -> Vec<ShipSnapshot> {
    fleet
        .iter()
        .cloned()
        .map(|mut s| {
            s.hull = 0;
            s.alive = false;
            s
        })
        .collect()
}

impl CombatResolver for ScriptedResolver {
    fn simulate(
        &self,
        seed: u64,
        player_a: &PlayerId,
        _player_b: &PlayerId,
        fleet_a: &[ShipSnapshot],
        fleet_b: &[ShipSnapshot],
    ) -> CombatOutcome {
        if let Ok(mut seeds) = self.seeds.lock() {
            seeds.push(seed);
        }
        let a_wins = &self.winner == player_a;
        CombatOutcome {
            winner: self.winner.clone(),
            round_log: vec![format!("scripted win for {}", self.winner)],
            final_fleet_a: if a_wins { fleet_a.to_vec() } else { sunk(fleet_a) },
            final_fleet_b: if a_wins { sunk(fleet_b) } else { fleet_b.to_vec() },
        }
    }
}
