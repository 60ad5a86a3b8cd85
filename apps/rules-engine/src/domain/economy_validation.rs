//! Dry-run invariant checks over an economy snapshot.

use crate::domain::economy_types::PlayerEconomy;
use crate::domain::resources::Resource;
use crate::domain::tables::MAX_CUBES;
use crate::errors::domain::DomainError;

/// List every violated invariant; empty means the snapshot is consistent.
pub fn validate_economy(economy: &PlayerEconomy) -> Vec<String> {
    let mut violations = Vec::new();

    for resource in Resource::ALL {
        let stored = economy.resources.get(resource);
        if stored < 0 {
            violations.push(format!("{resource} is negative ({stored})"));
        }

        let cubes = economy.population.get(resource).cubes_remaining;
        if !(0..=MAX_CUBES).contains(&cubes) {
            violations.push(format!(
                "{resource} cubes remaining {cubes} outside 0..={MAX_CUBES}"
            ));
        }
    }

    let inf = &economy.influence;
    for (label, value) in [
        ("on track", inf.on_track),
        ("on actions", inf.on_actions),
        ("on sectors", inf.on_sectors),
        ("total", inf.total_available),
    ] {
        if value < 0 {
            violations.push(format!("influence {label} is negative ({value})"));
        }
    }
    let placed = inf.on_track + inf.on_actions + inf.on_sectors;
    if placed != inf.total_available {
        violations.push(format!(
            "influence not conserved: {} on track + {} on actions + {} on sectors != {} total",
            inf.on_track, inf.on_actions, inf.on_sectors, inf.total_available
        ));
    }

    let ships = &economy.colony_ships;
    if ships.available < 0 || ships.used < 0 || ships.total < 0 {
        violations.push(format!(
            "colony ships negative (total {}, available {}, used {})",
            ships.total, ships.available, ships.used
        ));
    }
    if ships.available + ships.used != ships.total {
        violations.push(format!(
            "colony ships not conserved: {} available + {} used != {} total",
            ships.available, ships.used, ships.total
        ));
    }

    violations
}

/// Turn a non-empty violation list into an invariant error.
pub fn require_valid_economy(economy: &PlayerEconomy) -> Result<(), DomainError> {
    let violations = validate_economy(economy);
    if violations.is_empty() {
        return Ok(());
    }
    Err(DomainError::invariant(format!(
        "economy of {} is inconsistent: {}",
        economy.player_id,
        violations.join("; ")
    )))
}
