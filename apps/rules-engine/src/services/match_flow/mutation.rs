use tracing::{debug, warn};

use super::MatchFlowService;
use crate::domain::economy_validation::require_valid_economy;
use crate::domain::match_transition::{derive_match_transitions, MatchLifecycleView};
use crate::domain::{CombatResolver, MatchTransition, TurnSummary};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::{MatchRecord, MatchStore};

#[derive(Debug, Clone)]
pub struct MutationResult {
    pub record: MatchRecord,
    pub old_version: i32,
    pub new_version: i32,
    pub transitions: Vec<MatchTransition>,
    pub summary: TurnSummary,
}

impl MutationResult {
    pub fn final_version(&self) -> i32 {
        self.new_version
    }
}

impl<S, R> MatchFlowService<S, R>
where
    S: MatchStore,
    R: CombatResolver,
{
    /// Load, mutate a private copy, check economies, then compare-and-swap.
    ///
    /// With `expected_version` set, a stale version is an immediate
    /// `OPTIMISTIC_LOCK` conflict. Without it, losing a CAS race reloads and
    /// re-runs `mutation` up to `max_write_retries` times.
    pub(super) async fn run_mutation<F>(
        &self,
        match_id: &str,
        expected_version: Option<i32>,
        mutation: F,
    ) -> Result<MutationResult, AppError>
    where
        F: Fn(&mut MatchRecord) -> Result<Vec<MatchTransition>, AppError> + Send + Sync,
    {
        let mut attempt: u32 = 0;
        loop {
            let loaded = self.store.load(match_id).await?;
            let old_version = loaded.version;

            if let Some(expected) = expected_version {
                if expected != old_version {
                    return Err(DomainError::conflict(
                        ConflictKind::OptimisticLock,
                        format!(
                            "Match was modified concurrently (expected version {expected}, actual version {old_version}). Please refresh and retry."
                        ),
                    )
                    .into());
                }
            }

            let before = MatchLifecycleView::of(old_version, &loaded.value.match_state);
            let mut record = loaded.value;
            let mut explicit_transitions = mutation(&mut record)?;

            for economy in record.economies.values() {
                require_valid_economy(economy)?;
            }

            let write = if record.match_state.is_finished() {
                self.store
                    .archive(match_id, old_version, record.clone())
                    .await
            } else {
                self.store
                    .compare_and_swap(match_id, old_version, record.clone())
                    .await
            };

            match write {
                Ok(new_version) => {
                    let after = MatchLifecycleView::of(new_version, &record.match_state);
                    let mut transitions = derive_match_transitions(&before, &after);
                    transitions.append(&mut explicit_transitions);
                    let summary = TurnSummary::of(&record.match_state, &transitions);
                    debug!(
                        match_id,
                        old_version,
                        new_version,
                        transitions = transitions.len(),
                        "Mutation committed"
                    );
                    return Ok(MutationResult {
                        record,
                        old_version,
                        new_version,
                        transitions,
                        summary,
                    });
                }
                Err(DomainError::Conflict(ConflictKind::OptimisticLock, detail))
                    if expected_version.is_none() && attempt < self.config.max_write_retries =>
                {
                    attempt += 1;
                    warn!(match_id, attempt, detail = %detail, "Write lost a version race, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
