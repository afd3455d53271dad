//! Roster data models: schools, players and persisted matches.

use super::rank::RankCode;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// School ID type
pub type SchoolId = i64;

/// Player ID type
pub type PlayerId = i64;

/// Persisted match ID type
pub type MatchId = i64;

/// School a player competes for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
}

/// A window of time during which a player can be scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl AvailabilityWindow {
    /// Create a new availability window
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// A window must end strictly after it starts
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Whether `at` falls inside the window (end exclusive)
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }
}

/// Player model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Unaffiliated players hold ranks that no ledger tracks
    pub school_id: Option<SchoolId>,
    pub ranks: BTreeSet<RankCode>,
    #[serde(default)]
    pub availability: Vec<AvailabilityWindow>,
    /// Overrides the tournament's default minimum rest between matches
    #[serde(default)]
    pub min_rest_minutes: Option<u32>,
}

impl Player {
    /// Whether the player can be scheduled at `at`. A player without
    /// declared windows is always available.
    pub fn is_available_at(&self, at: NaiveDateTime) -> bool {
        self.availability.is_empty() || self.availability.iter().any(|w| w.contains(at))
    }

    /// Minimum rest for this player, falling back to the tournament default
    pub fn effective_min_rest(&self, default_minutes: u32) -> u32 {
        self.min_rest_minutes.unwrap_or(default_minutes)
    }
}

/// Input for creating a player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub school_id: Option<SchoolId>,
    pub ranks: BTreeSet<RankCode>,
    pub availability: Vec<AvailabilityWindow>,
    pub min_rest_minutes: Option<u32>,
}

impl NewPlayer {
    /// Create a player input with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Place the player in a school
    pub fn in_school(mut self, school_id: SchoolId) -> Self {
        self.school_id = Some(school_id);
        self
    }

    /// Give the player ranks
    pub fn with_ranks(mut self, ranks: impl IntoIterator<Item = RankCode>) -> Self {
        self.ranks = ranks.into_iter().collect();
        self
    }
}

/// Partial update for a single player; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub school_id: Option<Option<SchoolId>>,
    pub ranks: Option<BTreeSet<RankCode>>,
    pub availability: Option<Vec<AvailabilityWindow>>,
    pub min_rest_minutes: Option<Option<u32>>,
}

/// Match format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Two schools
    Dual,
    /// Three schools
    Tri,
}

impl MatchType {
    /// Number of sides (and therefore schools) a match of this type has
    pub fn side_count(self) -> usize {
        match self {
            MatchType::Dual => 2,
            MatchType::Tri => 3,
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Dual => write!(f, "dual"),
            MatchType::Tri => write!(f, "tri"),
        }
    }
}

/// Persisted match entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub rank: RankCode,
    pub match_type: MatchType,
    /// One ordered set of players per side; sideA first
    pub sides: Vec<BTreeSet<PlayerId>>,
}

impl Match {
    /// Whether a player takes part in this match
    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.sides.iter().any(|side| side.contains(&player_id))
    }
}

/// Input for creating a persisted match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDraft {
    pub rank: RankCode,
    pub match_type: MatchType,
    pub sides: Vec<BTreeSet<PlayerId>>,
}
