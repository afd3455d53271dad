//! Schedule solver seam.
//!
//! The solver itself lives outside this crate; it receives a finalized
//! roster with its matches and answers with court/slot assignments tagged
//! with the epoch it was asked about.

use super::{
    errors::SolverError,
    models::{ScheduleRequest, ScheduleResponse},
};
use async_trait::async_trait;

/// External schedule solver
#[async_trait]
pub trait ScheduleSolver: Send + Sync {
    /// Produce assignments for every match in the request
    async fn solve(&self, request: ScheduleRequest) -> Result<ScheduleResponse, SolverError>;
}

/// Mock solvers for testing
#[cfg(any(test, feature = "test-support"))]
pub mod mock {
    use super::*;
    use crate::schedule::models::SlotAssignment;

    /// Places matches round-robin over the configured courts
    pub struct RoundRobinSolver;

    #[async_trait]
    impl ScheduleSolver for RoundRobinSolver {
        async fn solve(&self, request: ScheduleRequest) -> Result<ScheduleResponse, SolverError> {
            let courts = request.config.court_count.max(1);
            let assignments = request
                .matches
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    let i = i as u32;
                    let slot = i / courts;
                    SlotAssignment {
                        match_id: m.id,
                        court: i % courts + 1,
                        slot,
                        starts_at: request.config.slot_start(slot),
                    }
                })
                .collect();

            Ok(ScheduleResponse {
                request_id: request.request_id,
                epoch: request.epoch,
                assignments,
            })
        }
    }

    /// Always fails
    pub struct FailingSolver(pub SolverError);

    #[async_trait]
    impl ScheduleSolver for FailingSolver {
        async fn solve(&self, _request: ScheduleRequest) -> Result<ScheduleResponse, SolverError> {
            Err(self.0.clone())
        }
    }

}
