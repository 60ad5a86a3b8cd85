//! Domain layer: pure rules for phases, turns and the resource economy.

pub mod actions;
pub mod colony_ships;
pub mod combat;
pub mod economy;
pub mod economy_types;
pub mod economy_validation;
pub mod influence;
pub mod match_state;
pub mod match_transition;
pub mod phase_machine;
pub mod population;
pub mod production;
pub mod resources;
pub mod seed_derivation;
pub mod state;
pub mod tables;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_economy;
#[cfg(test)]
mod tests_phase_machine;
#[cfg(test)]
mod tests_props_conservation;
#[cfg(test)]
mod tests_props_phase;

// Re-exports for ergonomics
pub use actions::{ActionKind, ActionValidation};
pub use combat::{CombatOutcome, CombatReport, CombatResolver, Sector, ShipSnapshot, Weapon};
pub use economy_types::PlayerEconomy;
pub use match_state::{Match, MatchStatus};
pub use match_transition::{MatchTransition, TurnSummary};
pub use resources::{Resource, ResourceCost, ResourcePool};
pub use seed_derivation::{combat_seed_key, derive_combat_seed};
pub use state::{Phase, PhaseState, PlayerActionState, PlayerId, SectorId};
