use std::collections::BTreeMap;

use time::OffsetDateTime;
use tracing::info;

use super::{MatchFlowService, MutationResult};
use crate::domain::phase_machine::{
    initialize_with_influence, validate_action, validate_income_multiplier, IncomeSchedule,
};
use crate::domain::{
    ActionKind, ActionValidation, CombatResolver, Match, MatchTransition, PlayerEconomy, PlayerId,
    TurnSummary,
};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::{MatchRecord, MatchStore, Versioned};

/// One seat at match creation. Unset fields fall back to engine defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatOptions {
    pub player_id: PlayerId,
    pub trade_ratio: Option<i32>,
    pub income_multiplier: Option<f64>,
}

impl SeatOptions {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            trade_ratio: None,
            income_multiplier: None,
        }
    }

    pub fn with_trade_ratio(mut self, trade_ratio: i32) -> Self {
        self.trade_ratio = Some(trade_ratio);
        self
    }

    pub fn with_income_multiplier(mut self, multiplier: f64) -> Self {
        self.income_multiplier = Some(multiplier);
        self
    }
}

impl<S, R> MatchFlowService<S, R>
where
    S: MatchStore,
    R: CombatResolver,
{
    /// Seat players with default economies and store the match at version 1.
    pub async fn create_match(
        &self,
        match_id: &str,
        player_ids: &[PlayerId],
    ) -> Result<MutationResult, AppError> {
        let seats = player_ids.iter().cloned().map(SeatOptions::new).collect();
        self.create_match_with_seats(match_id, seats).await
    }

    pub async fn create_match_with_seats(
        &self,
        match_id: &str,
        seats: Vec<SeatOptions>,
    ) -> Result<MutationResult, AppError> {
        if seats.len() < 2 {
            return Err(DomainError::validation(
                ValidationKind::InvalidPlayers,
                format!("A match needs at least 2 players, got {}", seats.len()),
            )
            .into());
        }

        let turn_order: Vec<PlayerId> = seats.iter().map(|s| s.player_id.clone()).collect();
        // Rejects duplicate seats
        initialize_with_influence(&turn_order, 1, 0, self.config.max_influence)?;

        let mut economies = BTreeMap::new();
        let mut income = IncomeSchedule {
            base: self.config.base_income,
            multipliers: BTreeMap::new(),
        };
        for seat in &seats {
            let trade_ratio = seat.trade_ratio.unwrap_or(self.config.default_trade_ratio);
            if trade_ratio < 1 {
                return Err(DomainError::validation_other(format!(
                    "Trade ratio for {} must be positive, got {trade_ratio}",
                    seat.player_id
                ))
                .into());
            }
            economies.insert(
                seat.player_id.clone(),
                PlayerEconomy::new(seat.player_id.clone()).with_trade_ratio(trade_ratio),
            );
            if let Some(m) = seat.income_multiplier {
                validate_income_multiplier(m)?;
                income.multipliers.insert(seat.player_id.clone(), m);
            }
        }

        let now = OffsetDateTime::now_utc();
        let record = MatchRecord {
            match_state: Match::new(match_id, turn_order, self.config.max_rounds),
            economies,
            sectors: BTreeMap::new(),
            production: BTreeMap::new(),
            income,
            combat_reports: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let stored = self.store.insert(record).await?;
        let state = &stored.value.match_state;
        let mut transitions = vec![MatchTransition::RoundStarted {
            round_no: state.round_no,
        }];
        if let Some(first) = state.active_player() {
            transitions.push(MatchTransition::TurnBecame {
                player_id: first.clone(),
            });
        }

        info!(
            match_id,
            players = state.turn_order.len(),
            max_rounds = state.max_rounds,
            "Match created"
        );

        let summary = TurnSummary::of(state, &transitions);
        Ok(MutationResult {
            record: stored.value,
            old_version: 0,
            new_version: stored.version,
            transitions,
            summary,
        })
    }

    /// Current versioned record of an active match.
    pub async fn load_match(&self, match_id: &str) -> Result<Versioned<MatchRecord>, AppError> {
        Ok(self.store.load(match_id).await?)
    }

    /// Read-only turn summary at the current version.
    pub async fn load_summary(&self, match_id: &str) -> Result<Versioned<TurnSummary>, AppError> {
        let loaded = self.store.load(match_id).await?;
        Ok(Versioned {
            version: loaded.version,
            value: TurnSummary::of(&loaded.value.match_state, &[]),
        })
    }

    /// Dry-run legality check for an action; never writes.
    pub async fn check_action(
        &self,
        match_id: &str,
        player_id: &PlayerId,
        kind: ActionKind,
    ) -> Result<ActionValidation, AppError> {
        let loaded = self.store.load(match_id).await?;
        let state = loaded
            .value
            .match_state
            .phase_state(&loaded.value.economies, self.config.max_influence)?;
        Ok(validate_action(&state, player_id, kind))
    }
}
