//! Action kinds and the result of a legality check.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// Influence disks every base action costs.
pub const BASE_ACTION_COST: i32 = 1;

/// Closed set of actions a player can take during the Action phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Explore,
    Influence,
    Research,
    Upgrade,
    Build,
    Move,
    /// Ends normal participation for the round, leaving one reaction.
    Pass,
}

impl ActionKind {
    pub const fn is_pass(self) -> bool {
        matches!(self, ActionKind::Pass)
    }

    /// Influence disks required to take this action.
    pub const fn influence_cost(self) -> i32 {
        match self {
            ActionKind::Pass => 0,
            ActionKind::Explore
            | ActionKind::Influence
            | ActionKind::Research
            | ActionKind::Upgrade
            | ActionKind::Build
            | ActionKind::Move => BASE_ACTION_COST,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ActionKind::Explore => "explore",
            ActionKind::Influence => "influence",
            ActionKind::Research => "research",
            ActionKind::Upgrade => "upgrade",
            ActionKind::Build => "build",
            ActionKind::Move => "move",
            ActionKind::Pass => "pass",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of `validate_action`. The reason is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip)]
    pub kind: Option<ValidationKind>,
}

impl ActionValidation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
            kind: None,
        }
    }

    pub fn rejected(kind: ValidationKind, reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
            kind: Some(kind),
        }
    }

    /// Convert a rejection into the matching rule-violation error.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.valid {
            return Ok(());
        }
        let reason = self.reason.unwrap_or_else(|| "action rejected".to_string());
        let kind = self.kind.unwrap_or(ValidationKind::Other(reason.clone()));
        Err(DomainError::validation(kind, reason))
    }
}
