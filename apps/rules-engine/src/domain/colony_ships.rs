//! Colony-ship pool. Used ships stay used until an explicit refresh.

use crate::domain::economy_types::PlayerEconomy;
use crate::errors::domain::{DomainError, ValidationKind};

pub fn use_colony_ship(economy: &PlayerEconomy) -> Result<PlayerEconomy, DomainError> {
    if economy.colony_ships.available <= 0 {
        return Err(DomainError::validation(
            ValidationKind::PoolExhausted,
            "No colony ships available",
        ));
    }

    let mut next = economy.clone();
    next.colony_ships.available -= 1;
    next.colony_ships.used += 1;
    Ok(next)
}

/// Return every used ship to the available pool.
pub fn refresh_colony_ships(economy: &PlayerEconomy) -> PlayerEconomy {
    let mut next = economy.clone();
    next.colony_ships.available = next.colony_ships.total;
    next.colony_ships.used = 0;
    next
}

pub fn add_bonus_colony_ship(economy: &PlayerEconomy) -> PlayerEconomy {
    let mut next = economy.clone();
    next.colony_ships.total += 1;
    next.colony_ships.available += 1;
    next
}
