//! Error codes for the rules engine.
//!
//! This module defines all error codes surfaced by the engine's services.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE.

use core::fmt;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind};

/// Centralized error codes for the rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Rule violations
    /// Not enough influence disks to pay for the action
    InsufficientInfluence,
    /// Not enough stored resources
    InsufficientResources,
    /// Acting out of turn
    OutOfTurn,
    /// Action not allowed in the current phase
    PhaseMismatch,
    /// Player already passed and has no reaction left
    AlreadyPassed,
    /// Population or influence track exhausted
    TrackExhausted,
    /// Colony ship pool exhausted
    PoolExhausted,
    /// Malformed trade request
    InvalidTrade,
    /// Sector does not exist
    UnknownSector,
    /// Invalid seating for a new match
    InvalidPlayers,
    /// General validation error
    ValidationError,

    // Resource Not Found
    /// Match not found
    MatchNotFound,
    /// Player not seated in the match
    PlayerNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Optimistic lock conflict
    OptimisticLock,
    /// Match id already in use
    MatchExists,
    /// Match already archived
    MatchArchived,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Contract or conservation breach
    InvariantViolation,
    /// Data corruption detected
    DataCorruption,
    /// Configuration error
    ConfigError,
    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientInfluence => "INSUFFICIENT_INFLUENCE",
            Self::InsufficientResources => "INSUFFICIENT_RESOURCES",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::AlreadyPassed => "ALREADY_PASSED",
            Self::TrackExhausted => "TRACK_EXHAUSTED",
            Self::PoolExhausted => "POOL_EXHAUSTED",
            Self::InvalidTrade => "INVALID_TRADE",
            Self::UnknownSector => "UNKNOWN_SECTOR",
            Self::InvalidPlayers => "INVALID_PLAYERS",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::MatchNotFound => "MATCH_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::MatchExists => "MATCH_EXISTS",
            Self::MatchArchived => "MATCH_ARCHIVED",
            Self::Conflict => "CONFLICT",

            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::InsufficientInfluence => Self::InsufficientInfluence,
                ValidationKind::InsufficientResources => Self::InsufficientResources,
                ValidationKind::OutOfTurn => Self::OutOfTurn,
                ValidationKind::PhaseMismatch => Self::PhaseMismatch,
                ValidationKind::AlreadyPassed => Self::AlreadyPassed,
                ValidationKind::TrackExhausted => Self::TrackExhausted,
                ValidationKind::PoolExhausted => Self::PoolExhausted,
                ValidationKind::InvalidTrade => Self::InvalidTrade,
                ValidationKind::UnknownSector => Self::UnknownSector,
                ValidationKind::InvalidPlayers => Self::InvalidPlayers,
                ValidationKind::Other(_) => Self::ValidationError,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::OptimisticLock => Self::OptimisticLock,
                ConflictKind::MatchExists => Self::MatchExists,
                ConflictKind::MatchArchived => Self::MatchArchived,
                ConflictKind::Other(_) => Self::Conflict,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Match => Self::MatchNotFound,
                NotFoundKind::Player => Self::PlayerNotFound,
                NotFoundKind::Other(_) => Self::NotFound,
            },
            DomainError::Invariant(_) => Self::InvariantViolation,
            DomainError::Infra(kind, _) => match kind {
                InfraErrorKind::DataCorruption => Self::DataCorruption,
            },
        }
    }
}
