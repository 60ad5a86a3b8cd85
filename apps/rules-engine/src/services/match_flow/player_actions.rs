use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{MatchFlowService, MutationResult};
use crate::domain::colony_ships::{refresh_colony_ships, use_colony_ship};
use crate::domain::economy::trade_resources;
use crate::domain::influence::{place_influence_on_action, place_influence_on_sector};
use crate::domain::phase_machine::{execute_action, validate_action};
use crate::domain::population::place_population_cube;
use crate::domain::{
    ActionKind, CombatResolver, MatchTransition, Phase, PlayerId, Resource, Sector, SectorId,
    ShipSnapshot,
};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::repos::{MatchRecord, MatchStore};

/// Everything a seated player can submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerCommand {
    /// A turn action; `target_sector` is only read by Explore and Influence.
    Action {
        kind: ActionKind,
        #[serde(default)]
        target_sector: Option<SectorId>,
    },
    /// Free action: spend a colony ship to deploy a population cube.
    Colonize { resource: Resource },
    /// Free action: buy `amount` of `to` with `from` at the player's ratio.
    Trade {
        from: Resource,
        to: Resource,
        amount: i32,
    },
}

impl PlayerCommand {
    pub fn action(kind: ActionKind) -> Self {
        Self::Action {
            kind,
            target_sector: None,
        }
    }

    pub fn targeted(kind: ActionKind, sector_id: SectorId) -> Self {
        Self::Action {
            kind,
            target_sector: Some(sector_id),
        }
    }

    pub fn pass() -> Self {
        Self::action(ActionKind::Pass)
    }
}

fn require_seated(record: &MatchRecord, player_id: &PlayerId) -> Result<(), DomainError> {
    if record.match_state.is_seated(player_id) {
        return Ok(());
    }
    Err(DomainError::not_found(
        NotFoundKind::Player,
        format!("Player {player_id} is not seated in match {}", record.id()),
    ))
}

fn require_action_phase(record: &MatchRecord) -> Result<(), DomainError> {
    if record.match_state.phase == Phase::Action && !record.match_state.is_finished() {
        return Ok(());
    }
    Err(DomainError::validation(
        ValidationKind::PhaseMismatch,
        format!(
            "Only allowed in the action phase (now {})",
            record.match_state.phase
        ),
    ))
}

impl<S, R> MatchFlowService<S, R>
where
    S: MatchStore,
    R: CombatResolver,
{
    /// Apply one player command and run any automatic phase progression.
    pub async fn submit(
        &self,
        match_id: &str,
        player_id: &PlayerId,
        command: PlayerCommand,
        expected_version: Option<i32>,
    ) -> Result<MutationResult, AppError> {
        debug!(match_id, player_id = %player_id, command = ?command, "Submitting command");

        let result = self
            .run_mutation(match_id, expected_version, |record| {
                self.apply_command(record, player_id, &command)
            })
            .await?;

        info!(
            match_id,
            player_id = %player_id,
            round = result.summary.round_no,
            phase = %result.summary.phase,
            version = result.new_version,
            "Command applied"
        );
        Ok(result)
    }

    /// Pass on behalf of an idle active player.
    pub async fn force_pass(
        &self,
        match_id: &str,
        player_id: &PlayerId,
        expected_version: Option<i32>,
    ) -> Result<MutationResult, AppError> {
        let result = self
            .run_mutation(match_id, expected_version, |record| {
                require_seated(record, player_id)?;
                if record.match_state.active_player() != Some(player_id) {
                    return Err(DomainError::validation(
                        ValidationKind::OutOfTurn,
                        format!("Cannot force a pass for {player_id}: not the active player"),
                    )
                    .into());
                }
                self.apply_command(record, player_id, &PlayerCommand::pass())
            })
            .await?;

        info!(match_id, player_id = %player_id, "Forced pass");
        Ok(result)
    }

    /// Add ships to a player's fleet in a sector, creating the sector if needed.
    pub async fn deploy_fleet(
        &self,
        match_id: &str,
        sector_id: &SectorId,
        player_id: &PlayerId,
        ships: Vec<ShipSnapshot>,
        expected_version: Option<i32>,
    ) -> Result<MutationResult, AppError> {
        self.run_mutation(match_id, expected_version, |record| {
            require_seated(record, player_id)?;
            if record.match_state.is_finished() {
                return Err(DomainError::validation(
                    ValidationKind::PhaseMismatch,
                    "Match is already finished",
                )
                .into());
            }
            record
                .sectors
                .entry(sector_id.clone())
                .or_insert_with(|| Sector::new(sector_id.clone()))
                .fleets
                .entry(player_id.clone())
                .or_default()
                .extend(ships.iter().cloned());
            debug!(match_id, sector = %sector_id, player_id = %player_id, ships = ships.len(), "Fleet deployed");
            Ok(Vec::new())
        })
        .await
    }

    fn apply_command(
        &self,
        record: &mut MatchRecord,
        player_id: &PlayerId,
        command: &PlayerCommand,
    ) -> Result<Vec<MatchTransition>, AppError> {
        require_seated(record, player_id)?;

        match command {
            PlayerCommand::Action {
                kind,
                target_sector,
            } => self.apply_action(record, player_id, *kind, target_sector.as_ref()),
            PlayerCommand::Colonize { resource } => {
                require_action_phase(record)?;
                let state = &record.match_state;
                let passed = state.passed_players.contains(player_id);
                if !passed && state.active_player() != Some(player_id) {
                    return Err(DomainError::validation(
                        ValidationKind::OutOfTurn,
                        "Colonize is only allowed on your turn or after passing",
                    )
                    .into());
                }
                let economy = record.economy_mut(player_id)?;
                let next = use_colony_ship(economy)?;
                *economy = place_population_cube(&next, *resource)?;
                Ok(Vec::new())
            }
            PlayerCommand::Trade { from, to, amount } => {
                require_action_phase(record)?;
                let economy = record.economy_mut(player_id)?;
                *economy = trade_resources(economy, *from, *to, *amount)?;
                Ok(Vec::new())
            }
        }
    }

    fn apply_action(
        &self,
        record: &mut MatchRecord,
        player_id: &PlayerId,
        kind: ActionKind,
        target_sector: Option<&SectorId>,
    ) -> Result<Vec<MatchTransition>, AppError> {
        let state = record
            .match_state
            .phase_state(&record.economies, self.config.max_influence)?;
        validate_action(&state, player_id, kind).into_result()?;

        if !kind.is_pass() {
            let economy = record.economy_mut(player_id)?;
            *economy = place_influence_on_action(economy)?;
            self.apply_action_effect(record, player_id, kind, target_sector)?;
        } else if target_sector.is_some() {
            return Err(DomainError::validation_other("Pass takes no target sector").into());
        }

        let next = execute_action(&state, player_id, kind)?;
        record.match_state.absorb(&next);

        let mut transitions = Vec::new();
        if next.all_players_passed {
            info!(
                match_id = record.id(),
                round = next.round_no,
                "All players passed"
            );
            transitions.push(MatchTransition::ActionPhaseCompleted {
                round_no: next.round_no,
            });
            self.progress_rounds(record, &mut transitions)?;
        }
        Ok(transitions)
    }

    fn apply_action_effect(
        &self,
        record: &mut MatchRecord,
        player_id: &PlayerId,
        kind: ActionKind,
        target_sector: Option<&SectorId>,
    ) -> Result<(), AppError> {
        match (kind, target_sector) {
            (ActionKind::Explore, Some(sector_id)) => {
                if record.sectors.contains_key(sector_id) {
                    return Err(DomainError::validation_other(format!(
                        "Sector {sector_id} has already been explored"
                    ))
                    .into());
                }
                let economy = record.economy_mut(player_id)?;
                *economy = place_influence_on_sector(economy)?;
                let mut sector = Sector::new(sector_id.clone());
                sector.controller = Some(player_id.clone());
                record.sectors.insert(sector_id.clone(), sector);
            }
            (ActionKind::Influence, target) => {
                let economy = record.economy_mut(player_id)?;
                *economy = refresh_colony_ships(economy);
                if let Some(sector_id) = target {
                    let Some(sector) = record.sectors.get(sector_id) else {
                        return Err(DomainError::validation(
                            ValidationKind::UnknownSector,
                            format!("Sector {sector_id} does not exist"),
                        )
                        .into());
                    };
                    if let Some(controller) = &sector.controller {
                        return Err(DomainError::validation_other(format!(
                            "Sector {sector_id} is already controlled by {controller}"
                        ))
                        .into());
                    }
                    let economy = record.economy_mut(player_id)?;
                    *economy = place_influence_on_sector(economy)?;
                    if let Some(sector) = record.sectors.get_mut(sector_id) {
                        sector.controller = Some(player_id.clone());
                    }
                }
            }
            (_, Some(sector_id)) => {
                return Err(DomainError::validation_other(format!(
                    "{kind} does not take a target sector (got {sector_id})"
                ))
                .into());
            }
            (_, None) => {}
        }
        Ok(())
    }
}
