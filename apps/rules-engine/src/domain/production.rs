//! Round-boundary economy: production report, upkeep payment, influence reset.

use serde::{Deserialize, Serialize};

use crate::domain::colony_ships::refresh_colony_ships;
use crate::domain::economy::credit;
use crate::domain::economy_types::PlayerEconomy;
use crate::domain::resources::Resource;
use crate::errors::domain::DomainError;

/// Read-only production figures for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionReport {
    pub money_income: i32,
    pub science_income: i32,
    pub materials_income: i32,
    pub upkeep_cost: i32,
    /// `money_income - upkeep_cost`; may be negative.
    pub net_money_income: i32,
}

/// Result of paying upkeep for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpkeepOutcome {
    pub economy: PlayerEconomy,
    pub production: ProductionReport,
    /// Uncovered part of a negative net income; never negative.
    pub shortfall: i32,
}

pub fn calculate_production(economy: &PlayerEconomy) -> ProductionReport {
    let money_income = economy.population.money.production_value;
    let upkeep_cost = economy.influence.upkeep_cost;
    ProductionReport {
        money_income,
        science_income: economy.population.science.production_value,
        materials_income: economy.population.materials.production_value,
        upkeep_cost,
        net_money_income: money_income - upkeep_cost,
    }
}

/// Apply production and pay upkeep.
///
/// Money is clamped at zero and the uncovered part is reported as `shortfall`;
/// running dry is an in-game event, not an error. Science and materials
/// accumulate their income untouched by upkeep. A counter overflow is an
/// invariant error.
pub fn execute_upkeep(economy: &PlayerEconomy) -> Result<UpkeepOutcome, DomainError> {
    let production = calculate_production(economy);
    let mut next = economy.clone();

    let money_after = credit(
        next.resources.money,
        production.net_money_income,
        Resource::Money,
    )?;
    let shortfall = (-money_after).max(0);
    next.resources.money = money_after.max(0);
    next.resources.science = credit(
        next.resources.science,
        production.science_income,
        Resource::Science,
    )?;
    next.resources.materials = credit(
        next.resources.materials,
        production.materials_income,
        Resource::Materials,
    )?;

    Ok(UpkeepOutcome {
        economy: next,
        production,
        shortfall,
    })
}

/// Bring action disks home and refresh colony ships; sector disks stay put.
pub fn reset_influence_after_round(economy: &PlayerEconomy) -> PlayerEconomy {
    let mut next = refresh_colony_ships(economy);
    next.influence.on_track += next.influence.on_actions;
    next.influence.on_actions = 0;
    next.influence.recompute_upkeep();
    next
}
