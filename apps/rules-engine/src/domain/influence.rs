//! Influence disk moves between the track, action spaces and sectors.
//!
//! Each move keeps `on_track + on_actions + on_sectors == total_available`
//! and recomputes `upkeep_cost` from the disks left on the track.

use crate::domain::economy_types::PlayerEconomy;
use crate::domain::tables::MAX_TRACK_DISKS;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiskSlot {
    Actions,
    Sectors,
}

impl DiskSlot {
    const fn label(self) -> &'static str {
        match self {
            DiskSlot::Actions => "actions",
            DiskSlot::Sectors => "sectors",
        }
    }
}

fn take_from_track(economy: &PlayerEconomy, slot: DiskSlot) -> Result<PlayerEconomy, DomainError> {
    if economy.influence.on_track <= 0 {
        return Err(DomainError::validation(
            ValidationKind::InsufficientInfluence,
            "No influence disks left on the track",
        ));
    }

    let mut next = economy.clone();
    next.influence.on_track -= 1;
    match slot {
        DiskSlot::Actions => next.influence.on_actions += 1,
        DiskSlot::Sectors => next.influence.on_sectors += 1,
    }
    next.influence.recompute_upkeep();
    Ok(next)
}

fn return_to_track(economy: &PlayerEconomy, slot: DiskSlot) -> Result<PlayerEconomy, DomainError> {
    let held = match slot {
        DiskSlot::Actions => economy.influence.on_actions,
        DiskSlot::Sectors => economy.influence.on_sectors,
    };
    if held <= 0 {
        return Err(DomainError::validation(
            ValidationKind::TrackExhausted,
            format!("No influence disks on {} to return", slot.label()),
        ));
    }

    let mut next = economy.clone();
    match slot {
        DiskSlot::Actions => next.influence.on_actions -= 1,
        DiskSlot::Sectors => next.influence.on_sectors -= 1,
    }
    next.influence.on_track += 1;
    next.influence.recompute_upkeep();
    Ok(next)
}

pub fn place_influence_on_action(economy: &PlayerEconomy) -> Result<PlayerEconomy, DomainError> {
    take_from_track(economy, DiskSlot::Actions)
}

pub fn place_influence_on_sector(economy: &PlayerEconomy) -> Result<PlayerEconomy, DomainError> {
    take_from_track(economy, DiskSlot::Sectors)
}

pub fn return_influence_from_action(
    economy: &PlayerEconomy,
) -> Result<PlayerEconomy, DomainError> {
    return_to_track(economy, DiskSlot::Actions)
}

pub fn return_influence_from_sector(
    economy: &PlayerEconomy,
) -> Result<PlayerEconomy, DomainError> {
    return_to_track(economy, DiskSlot::Sectors)
}

/// Add `amount` bonus disks straight onto the track.
pub fn add_bonus_influence(
    economy: &PlayerEconomy,
    amount: i32,
) -> Result<PlayerEconomy, DomainError> {
    if amount <= 0 {
        return Err(DomainError::validation_other(
            "Bonus influence must be positive",
        ));
    }
    if economy.influence.total_available + amount > MAX_TRACK_DISKS {
        return Err(DomainError::validation(
            ValidationKind::TrackExhausted,
            format!("Influence track holds at most {MAX_TRACK_DISKS} disks"),
        ));
    }

    let mut next = economy.clone();
    next.influence.on_track += amount;
    next.influence.total_available += amount;
    next.influence.recompute_upkeep();
    Ok(next)
}
