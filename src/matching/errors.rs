//! Connection graph error types.

use super::models::ConnectionId;
use crate::roster::{PlayerId, SchoolId};
use thiserror::Error;

/// Connection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// Both endpoints belong to the same school
    #[error("Both players belong to school {0}")]
    SameSchool(SchoolId),

    /// The same two players are already connected for this rank
    #[error("Players are already connected for this rank (connection {0})")]
    Duplicate(ConnectionId),

    #[error("Connection not found: {0}")]
    NotFound(ConnectionId),

    #[error("Player not found: {0}")]
    UnknownPlayer(PlayerId),

    /// Players without a school cannot be paired
    #[error("Player {0} has no school")]
    Unaffiliated(PlayerId),
}

/// Result type for connection operations
pub type ConnectionResult<T> = Result<T, ConnectionError>;
