use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::economy_types::DEFAULT_TRADE_RATIO;
use crate::domain::match_state::DEFAULT_MAX_ROUNDS;
use crate::domain::phase_machine::{BASE_INCOME, DEFAULT_MAX_INFLUENCE};
use crate::domain::tables::MAX_TRACK_DISKS;
use crate::domain::ResourcePool;
use crate::error::AppError;

/// Default bound on compare-and-swap retries for writes without an expected version.
pub const DEFAULT_MAX_WRITE_RETRIES: u32 = 5;

/// Tunables for one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub max_rounds: u8,
    /// Influence a player's phase state resets to at Upkeep.
    pub max_influence: i32,
    pub base_income: ResourcePool,
    /// Trade ratio for seats that do not bring their own.
    pub default_trade_ratio: i32,
    pub max_write_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_influence: DEFAULT_MAX_INFLUENCE,
            base_income: BASE_INCOME,
            default_trade_ratio: DEFAULT_TRADE_RATIO,
            max_write_retries: DEFAULT_MAX_WRITE_RETRIES,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `RULES_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source; unset names keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            max_rounds: parse_var(&lookup, "RULES_MAX_ROUNDS")?.unwrap_or(defaults.max_rounds),
            max_influence: parse_var(&lookup, "RULES_MAX_INFLUENCE")?
                .unwrap_or(defaults.max_influence),
            base_income: defaults.base_income,
            default_trade_ratio: parse_var(&lookup, "RULES_TRADE_RATIO")?
                .unwrap_or(defaults.default_trade_ratio),
            max_write_retries: parse_var(&lookup, "RULES_WRITE_RETRIES")?
                .unwrap_or(defaults.max_write_retries),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_rounds == 0 {
            return Err(AppError::config("max_rounds must be at least 1"));
        }
        if !(0..=MAX_TRACK_DISKS).contains(&self.max_influence) {
            return Err(AppError::config(format!(
                "max_influence must be within 0..={MAX_TRACK_DISKS}, got {}",
                self.max_influence
            )));
        }
        if self.default_trade_ratio < 1 {
            return Err(AppError::config(format!(
                "default_trade_ratio must be positive, got {}",
                self.default_trade_ratio
            )));
        }
        Ok(())
    }

    pub fn with_max_rounds(mut self, max_rounds: u8) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_max_write_retries(mut self, retries: u32) -> Self {
        self.max_write_retries = retries;
        self
    }
}

/// Parse an optional variable, failing loudly on malformed values.
fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::config(format!(
                "Environment variable '{name}' has an invalid value: '{raw}'"
            ))
        }),
    }
}
