//! Schedule error types.

use super::models::Epoch;
use thiserror::Error;

/// Failure reported by a schedule solver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// The solver could not place every match
    #[error("No feasible schedule: {0}")]
    Infeasible(String),

    #[error("Solver unavailable: {0}")]
    Unavailable(String),

    #[error("Solver timed out")]
    Timeout,
}

/// Schedule errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The model changed while the request was outstanding
    #[error("Stale schedule response for {response_epoch}, model is at {current_epoch}")]
    StaleData {
        response_epoch: Epoch,
        current_epoch: Epoch,
    },

    #[error("Solver failed: {0}")]
    Solver(#[from] SolverError),
}

/// Result type for schedule operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;
