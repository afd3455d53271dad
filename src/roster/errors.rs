//! Roster error types.

use super::{
    models::{MatchId, PlayerId, SchoolId},
    rank::RankParseError,
};
use thiserror::Error;

/// Roster errors
///
/// Rank collisions are not errors: they come back as
/// [`RankConflict`](super::conflicts::RankConflict) reports.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Input rejected at the boundary before reaching the ledger
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The call would break a roster invariant; nothing was mutated
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("School not found: {0}")]
    SchoolNotFound(SchoolId),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Invalid rank code: {0}")]
    InvalidRank(#[from] RankParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RosterError {
    /// Whether the error aborted the call because of a broken invariant
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, RosterError::InvariantViolation(_))
    }

    /// Whether the input was rejected before any state was consulted
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RosterError::Validation(_)
                | RosterError::SchoolNotFound(_)
                | RosterError::PlayerNotFound(_)
                | RosterError::MatchNotFound(_)
                | RosterError::InvalidRank(_)
                | RosterError::Serialization(_)
        )
    }
}

/// Result type for roster operations
pub type RosterResult<T> = Result<T, RosterError>;
