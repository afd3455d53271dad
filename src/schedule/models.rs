//! Schedule exchange models.

use crate::{
    config::TournamentConfig,
    roster::{Match, MatchId, Player, RosterState, School},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Version of the roster and match model. Advances on every change the
/// solver could observe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Epoch(pub u64);

impl Epoch {
    pub fn next(self) -> Self {
        Epoch(self.0 + 1)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch {}", self.0)
    }
}

/// Whether the last accepted schedule reflects the current model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StalenessState {
    Fresh,
    Stale,
}

/// Input handed to the schedule solver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub request_id: Uuid,
    pub epoch: Epoch,
    pub config: TournamentConfig,
    pub schools: Vec<School>,
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
}

impl ScheduleRequest {
    /// Snapshot the roster as solver input tagged with `epoch`
    pub fn from_roster(roster: &RosterState, epoch: Epoch) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            epoch,
            config: roster.config().clone(),
            schools: roster.schools().cloned().collect(),
            players: roster.players().cloned().collect(),
            matches: roster.matches().cloned().collect(),
        }
    }
}

/// Court and slot for one persisted match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub match_id: MatchId,
    pub court: u32,
    /// Zero-based slot index
    pub slot: u32,
    pub starts_at: Option<NaiveDateTime>,
}

/// Solver output, tagged with the epoch of the request it answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub request_id: Uuid,
    pub epoch: Epoch,
    pub assignments: Vec<SlotAssignment>,
}

/// Last accepted schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub epoch: Epoch,
    pub assignments: Vec<SlotAssignment>,
    pub received_at: DateTime<Utc>,
}

impl ScheduleSnapshot {
    pub fn assignment_for(&self, match_id: MatchId) -> Option<&SlotAssignment> {
        self.assignments.iter().find(|a| a.match_id == match_id)
    }
}
