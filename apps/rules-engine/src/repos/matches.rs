//! Persistence contract for match aggregates.
//!
//! A match and every economy in it live in one `MatchRecord`, so a single
//! compare-and-swap covers the whole aggregate. Stores never interpret the
//! record; all rules run in the domain layer before a write is attempted.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::economy_types::PlayerEconomy;
use crate::domain::phase_machine::IncomeSchedule;
use crate::domain::production::ProductionReport;
use crate::domain::{CombatReport, Match, PlayerId, Sector, SectorId};
use crate::errors::domain::{DomainError, NotFoundKind};

/// Version every freshly inserted record starts at.
pub const INITIAL_VERSION: i32 = 1;

/// Full persisted state of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_state: Match,
    pub economies: BTreeMap<PlayerId, PlayerEconomy>,
    pub sectors: BTreeMap<SectorId, Sector>,
    /// Latest per-player production report, refreshed at Upkeep.
    #[serde(default)]
    pub production: BTreeMap<PlayerId, ProductionReport>,
    pub income: IncomeSchedule,
    /// Every battle resolved so far, in resolution order.
    #[serde(default)]
    pub combat_reports: Vec<CombatReport>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl MatchRecord {
    pub fn id(&self) -> &str {
        &self.match_state.id
    }

    pub fn economy_mut(&mut self, player_id: &PlayerId) -> Result<&mut PlayerEconomy, DomainError> {
        let match_id = self.match_state.id.clone();
        self.economies
            .get_mut(player_id)
            .ok_or_else(|| player_not_found(&match_id, player_id))
    }
}

fn player_not_found(match_id: &str, player_id: &PlayerId) -> DomainError {
    DomainError::not_found(
        NotFoundKind::Player,
        format!("Player {player_id} is not seated in match {match_id}"),
    )
}

/// A value paired with the optimistic-lock version it was read at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: i32,
    pub value: T,
}

/// Keyed, versioned storage for match records.
///
/// `compare_and_swap` must be atomic per match: of two writers holding the
/// same version exactly one succeeds and the other sees
/// `Conflict(OptimisticLock)`.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Insert a new record at `INITIAL_VERSION`. Fails with `MatchExists`.
    async fn insert(&self, record: MatchRecord) -> Result<Versioned<MatchRecord>, DomainError>;

    /// Load an active match; archived matches are `MatchArchived` conflicts.
    async fn load(&self, match_id: &str) -> Result<Versioned<MatchRecord>, DomainError>;

    /// Replace the record iff its version is still `expected_version`.
    /// Returns the new version.
    async fn compare_and_swap(
        &self,
        match_id: &str,
        expected_version: i32,
        record: MatchRecord,
    ) -> Result<i32, DomainError>;

    /// Move a finished match out of the active set, same CAS rules as a write.
    async fn archive(
        &self,
        match_id: &str,
        expected_version: i32,
        record: MatchRecord,
    ) -> Result<i32, DomainError>;

    async fn load_archived(&self, match_id: &str) -> Result<Versioned<MatchRecord>, DomainError>;
}
