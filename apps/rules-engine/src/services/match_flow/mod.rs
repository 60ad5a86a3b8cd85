//! Match flow orchestration service - bridges the pure rules with the match store.
//!
//! Every public operation is one logical write: load the versioned record,
//! rebuild the phase state, apply domain functions to a private copy, check
//! every economy, then compare-and-swap. Rule violations abort before the
//! write and leave the stored match untouched.

mod mutation;
mod orchestration;
mod player_actions;
mod round_lifecycle;

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::domain::CombatResolver;
use crate::repos::MatchStore;

pub use mutation::MutationResult;
pub use orchestration::SeatOptions;
pub use player_actions::PlayerCommand;

/// Round orchestrator for one store and one combat resolver.
pub struct MatchFlowService<S, R> {
    store: Arc<S>,
    resolver: Arc<R>,
    config: EngineConfig,
}

impl<S, R> MatchFlowService<S, R>
where
    S: MatchStore,
    R: CombatResolver,
{
    pub fn new(store: Arc<S>, resolver: Arc<R>, config: EngineConfig) -> Self {
        Self {
            store,
            resolver,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn resolver(&self) -> &Arc<R> {
        &self.resolver
    }
}
