#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod infra;
pub mod repos;
pub mod services;

// Re-exports for public API
pub use config::EngineConfig;
pub use domain::{
    ActionKind, ActionValidation, CombatResolver, Match, MatchStatus, MatchTransition, Phase,
    PhaseState, PlayerEconomy, PlayerId, Resource, ResourceCost, ResourcePool, SectorId,
    ShipSnapshot, TurnSummary, Weapon,
};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use infra::{DiceCombatResolver, InMemoryMatchStore};
pub use repos::{MatchRecord, MatchStore, Versioned};
pub use services::{MatchFlowService, MutationResult, PlayerCommand, SeatOptions};

// Prelude for test convenience
pub mod prelude {
    pub use super::domain::*;
    pub use super::error::*;
    pub use super::errors::*;
    pub use super::repos::*;
    pub use super::services::*;
}

// Unit tests share the integration-test subscriber; filter with TEST_LOG
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    engine_test_support::test_logging::init();
}
