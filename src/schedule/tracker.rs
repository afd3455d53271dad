//! Staleness tracking for solver-produced schedules.

use super::{
    errors::{ScheduleError, ScheduleResult, SolverError},
    models::{Epoch, ScheduleResponse, ScheduleSnapshot, StalenessState},
};
use chrono::Utc;

/// Tracks whether the last accepted schedule still matches the model.
///
/// Starts `Stale` with no snapshot. Only a response carrying the current
/// epoch moves it to `Fresh`.
#[derive(Debug, Clone)]
pub struct ScheduleStalenessTracker {
    epoch: Epoch,
    state: StalenessState,
    snapshot: Option<ScheduleSnapshot>,
    last_error: Option<ScheduleError>,
}

impl Default for ScheduleStalenessTracker {
    fn default() -> Self {
        Self {
            epoch: Epoch::default(),
            state: StalenessState::Stale,
            snapshot: None,
            last_error: None,
        }
    }
}

impl ScheduleStalenessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn state(&self) -> StalenessState {
        self.state
    }

    pub fn is_fresh(&self) -> bool {
        self.state == StalenessState::Fresh
    }

    /// Last accepted schedule. Stays readable while stale.
    pub fn snapshot(&self) -> Option<&ScheduleSnapshot> {
        self.snapshot.as_ref()
    }

    /// Why the last request did not produce a schedule, if it didn't
    pub fn last_error(&self) -> Option<&ScheduleError> {
        self.last_error.as_ref()
    }

    /// Record a successful roster or match mutation
    pub fn mark_mutated(&mut self) -> Epoch {
        self.epoch = self.epoch.next();
        self.state = StalenessState::Stale;
        self.epoch
    }

    /// Epoch to stamp on an outgoing request
    pub fn begin_request(&self) -> Epoch {
        self.epoch
    }

    /// Accept a solver response.
    ///
    /// A response for any epoch other than the current one is discarded and
    /// the tracker stays `Stale`.
    pub fn accept(&mut self, response: ScheduleResponse) -> ScheduleResult<&ScheduleSnapshot> {
        if response.epoch != self.epoch {
            log::warn!(
                "Discarding schedule response {} for {}, model is at {}",
                response.request_id,
                response.epoch,
                self.epoch
            );
            let err = ScheduleError::StaleData {
                response_epoch: response.epoch,
                current_epoch: self.epoch,
            };
            self.state = StalenessState::Stale;
            self.last_error = Some(err.clone());
            return Err(err);
        }

        log::info!(
            "Accepted schedule with {} assignment(s) for {}",
            response.assignments.len(),
            response.epoch
        );
        self.state = StalenessState::Fresh;
        self.last_error = None;
        Ok(&*self.snapshot.insert(ScheduleSnapshot {
            epoch: response.epoch,
            assignments: response.assignments,
            received_at: Utc::now(),
        }))
    }

    /// Record a failed solver call. The tracker stays `Stale` and the
    /// previous snapshot is kept.
    pub fn reject(&mut self, error: SolverError) -> ScheduleError {
        log::warn!("Schedule request for {} failed: {}", self.epoch, error);
        let err = ScheduleError::from(error);
        self.state = StalenessState::Stale;
        self.last_error = Some(err.clone());
        err
    }
}
