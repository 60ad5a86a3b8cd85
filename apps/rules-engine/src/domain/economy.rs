//! Resource pool operations: affordability, spending, income and trade.
//!
//! Every function here is a pure transform over one player's snapshot. Bounds
//! are never clamped: an operation that would breach one fails instead.

use crate::domain::economy_types::PlayerEconomy;
use crate::domain::resources::{Resource, ResourceCost};
use crate::errors::domain::{DomainError, ValidationKind};

/// True iff every amount in `cost` is covered by stored resources.
pub fn can_afford(economy: &PlayerEconomy, cost: &ResourceCost) -> bool {
    cost.iter()
        .all(|(resource, amount)| economy.resources.get(resource) >= amount)
}

pub fn spend_resources(
    economy: &PlayerEconomy,
    cost: &ResourceCost,
) -> Result<PlayerEconomy, DomainError> {
    require_non_negative(cost)?;
    if !can_afford(economy, cost) {
        return Err(DomainError::validation(
            ValidationKind::InsufficientResources,
            format!("Insufficient resources: need {}", describe(cost)),
        ));
    }

    let mut next = economy.clone();
    for (resource, amount) in cost.iter() {
        *next.resources.get_mut(resource) -= amount;
    }
    Ok(next)
}

pub fn add_resources(
    economy: &PlayerEconomy,
    amounts: &ResourceCost,
) -> Result<PlayerEconomy, DomainError> {
    require_non_negative(amounts)?;
    let mut next = economy.clone();
    for (resource, amount) in amounts.iter() {
        let slot = next.resources.get_mut(resource);
        *slot = credit(*slot, amount, resource)?;
    }
    Ok(next)
}

/// Buy `receive_amount` of `to` by paying `receive_amount × trade_ratio` of `from`.
pub fn trade_resources(
    economy: &PlayerEconomy,
    from: Resource,
    to: Resource,
    receive_amount: i32,
) -> Result<PlayerEconomy, DomainError> {
    if from == to {
        return Err(DomainError::validation(
            ValidationKind::InvalidTrade,
            format!("Cannot trade {from} for itself"),
        ));
    }
    if receive_amount <= 0 {
        return Err(DomainError::validation(
            ValidationKind::InvalidTrade,
            "Trade amount must be positive",
        ));
    }

    let cost = receive_amount.checked_mul(economy.trade_ratio).ok_or_else(|| {
        DomainError::validation(ValidationKind::InvalidTrade, "Trade amount too large")
    })?;
    let stored = economy.resources.get(from);
    if stored < cost {
        return Err(DomainError::validation(
            ValidationKind::InsufficientResources,
            format!("Trading for {receive_amount} {to} costs {cost} {from}, only {stored} stored"),
        ));
    }

    let mut next = economy.clone();
    *next.resources.get_mut(from) -= cost;
    let slot = next.resources.get_mut(to);
    *slot = credit(*slot, receive_amount, to)?;
    Ok(next)
}

/// `stored + amount`, or an invariant error when the counter would overflow.
pub(crate) fn credit(stored: i32, amount: i32, resource: Resource) -> Result<i32, DomainError> {
    stored
        .checked_add(amount)
        .ok_or_else(|| DomainError::invariant(format!("{resource} counter overflowed")))
}

fn require_non_negative(amounts: &ResourceCost) -> Result<(), DomainError> {
    match amounts.iter().find(|(_, amount)| *amount < 0) {
        Some((resource, amount)) => Err(DomainError::validation_other(format!(
            "Amount for {resource} must not be negative (got {amount})"
        ))),
        None => Ok(()),
    }
}

fn describe(cost: &ResourceCost) -> String {
    cost.iter()
        .map(|(resource, amount)| format!("{amount} {resource}"))
        .collect::<Vec<_>>()
        .join(", ")
}
