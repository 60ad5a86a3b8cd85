use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::MatchFlowService;
use crate::domain::influence::{place_influence_on_sector, return_influence_from_sector};
use crate::domain::phase_machine::{
    advance_phase, is_action_phase_complete, process_income, process_upkeep,
};
use crate::domain::production::{calculate_production, execute_upkeep, reset_influence_after_round};
use crate::domain::{
    combat_seed_key, derive_combat_seed, CombatReport, CombatResolver, MatchStatus,
    MatchTransition, Phase, PhaseState, PlayerEconomy, PlayerId, ResourcePool, SectorId,
};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::repos::{MatchRecord, MatchStore};

/// Phase steps one progression may take: a full round is six.
const MAX_PHASE_STEPS: usize = 12;

fn economy_mut<'a>(
    economies: &'a mut BTreeMap<PlayerId, PlayerEconomy>,
    player_id: &PlayerId,
) -> Result<&'a mut PlayerEconomy, DomainError> {
    economies
        .get_mut(player_id)
        .ok_or_else(|| DomainError::invariant(format!("no economy for seated player {player_id}")))
}

impl<S, R> MatchFlowService<S, R>
where
    S: MatchStore,
    R: CombatResolver,
{
    /// Drive the match through Combat, Upkeep, Income, Cleanup and End after
    /// the action phase completes, stopping at the next open Action phase or
    /// when the last round ends.
    pub(super) fn progress_rounds(
        &self,
        record: &mut MatchRecord,
        transitions: &mut Vec<MatchTransition>,
    ) -> Result<(), AppError> {
        let mut state = record
            .match_state
            .phase_state(&record.economies, self.config.max_influence)?;

        for _ in 0..MAX_PHASE_STEPS {
            if state.phase == Phase::Action && !is_action_phase_complete(&state) {
                record.match_state.absorb(&state);
                return Ok(());
            }

            state = advance_phase(&state);
            transitions.push(MatchTransition::PhaseEntered {
                round_no: state.round_no,
                phase: state.phase,
            });

            match state.phase {
                Phase::Action => {
                    // New round: influence is re-read from the economies.
                    record.match_state.absorb(&state);
                    state = record
                        .match_state
                        .phase_state(&record.economies, self.config.max_influence)?;
                }
                Phase::Combat => self.resolve_combat(record, state.round_no, transitions)?,
                Phase::Upkeep => {
                    state = process_upkeep(&state);
                    record.production = record
                        .economies
                        .iter()
                        .map(|(id, econ)| (id.clone(), calculate_production(econ)))
                        .collect();
                }
                Phase::Income => self.collect_income(record, &state)?,
                Phase::Cleanup => {
                    for economy in record.economies.values_mut() {
                        *economy = reset_influence_after_round(economy);
                    }
                }
                Phase::End => {
                    record.match_state.absorb(&state);
                    if record.match_state.is_last_round() {
                        record.match_state.status = MatchStatus::Finished;
                        info!(
                            match_id = record.id(),
                            round = state.round_no,
                            "Final round complete, match finished"
                        );
                        return Ok(());
                    }
                }
            }
        }

        Err(AppError::internal(format!(
            "Phase progression for match {} exceeded {MAX_PHASE_STEPS} steps",
            record.id()
        )))
    }

    /// Pay upkeep from production, then grant base income.
    fn collect_income(
        &self,
        record: &mut MatchRecord,
        state: &PhaseState,
    ) -> Result<(), AppError> {
        let match_id = record.match_state.id.clone();
        for economy in record.economies.values_mut() {
            let outcome = execute_upkeep(economy)?;
            if outcome.shortfall > 0 {
                warn!(
                    match_id = %match_id,
                    player_id = %economy.player_id,
                    round = state.round_no,
                    shortfall = outcome.shortfall,
                    "Upkeep not covered, money clamped at zero"
                );
            }
            *economy = outcome.economy;
        }

        let snapshots: BTreeMap<PlayerId, ResourcePool> = record
            .economies
            .iter()
            .map(|(id, econ)| (id.clone(), econ.resources))
            .collect();
        let paid = process_income(state, &snapshots, &record.income)?;
        for (player_id, pool) in paid {
            if let Some(economy) = record.economies.get_mut(&player_id) {
                economy.resources = pool;
            }
        }
        debug!(match_id = %match_id, round = state.round_no, "Income collected");
        Ok(())
    }

    /// Resolve every contested sector in sector-id order.
    ///
    /// The first two players in turn order with live ships fight. The loser's
    /// sector disk goes back to their track; the winner takes control when it
    /// has a disk to place.
    fn resolve_combat(
        &self,
        record: &mut MatchRecord,
        round_no: u8,
        transitions: &mut Vec<MatchTransition>,
    ) -> Result<(), AppError> {
        let match_id = record.match_state.id.clone();
        let turn_order = record.match_state.turn_order.clone();
        let contested: Vec<SectorId> = record
            .sectors
            .values()
            .filter(|s| s.is_contested(&turn_order))
            .map(|s| s.id.clone())
            .collect();

        for sector_id in contested {
            let Some(sector) = record.sectors.get_mut(&sector_id) else {
                continue;
            };
            let combatants = sector.combatants(&turn_order);
            let (player_a, player_b) = match combatants.as_slice() {
                [a, b, ..] => (a.clone(), b.clone()),
                _ => continue,
            };

            let seed_key = combat_seed_key(&match_id, round_no, &sector_id);
            let seed = derive_combat_seed(&match_id, round_no, &sector_id);
            let fleet_a = sector.fleets.get(&player_a).cloned().unwrap_or_default();
            let fleet_b = sector.fleets.get(&player_b).cloned().unwrap_or_default();
            let outcome = self
                .resolver
                .simulate(seed, &player_a, &player_b, &fleet_a, &fleet_b);

            let loser = if outcome.winner == player_a {
                player_b.clone()
            } else if outcome.winner == player_b {
                player_a.clone()
            } else {
                return Err(DomainError::invariant(format!(
                    "combat resolver named {} the winner of {player_a} vs {player_b}",
                    outcome.winner
                ))
                .into());
            };

            for (player_id, fleet) in [
                (&player_a, &outcome.final_fleet_a),
                (&player_b, &outcome.final_fleet_b),
            ] {
                let survivors: Vec<_> = fleet.iter().filter(|s| s.alive).cloned().collect();
                if survivors.is_empty() {
                    sector.fleets.remove(player_id);
                } else {
                    sector.fleets.insert(player_id.clone(), survivors);
                }
            }

            if sector.controller.as_ref() == Some(&loser) {
                let economy = economy_mut(&mut record.economies, &loser)?;
                *economy = return_influence_from_sector(economy)?;
                sector.controller = None;
            }
            if sector.controller.is_none() {
                let economy = economy_mut(&mut record.economies, &outcome.winner)?;
                if economy.influence.on_track > 0 {
                    *economy = place_influence_on_sector(economy)?;
                    sector.controller = Some(outcome.winner.clone());
                }
            }

            info!(
                match_id = %match_id,
                round = round_no,
                sector = %sector_id,
                winner = %outcome.winner,
                loser = %loser,
                seed,
                "Combat resolved"
            );
            transitions.push(MatchTransition::CombatResolved {
                sector_id: sector_id.clone(),
                winner: outcome.winner.clone(),
            });
            record.combat_reports.push(CombatReport {
                sector_id,
                seed_key,
                seed,
                player_a,
                player_b,
                winner: outcome.winner,
                round_log: outcome.round_log,
            });
        }
        Ok(())
    }
}
