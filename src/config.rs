//! Tournament configuration.
//!
//! The configuration is persisted with the roster and handed to the
//! schedule solver unchanged.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Tournament configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Tournament name
    pub name: String,

    /// Number of courts available per slot
    pub court_count: u32,

    /// Length of one schedule slot in minutes
    pub slot_minutes: u32,

    /// Minimum rest between two matches of the same player, unless the
    /// player overrides it
    pub default_min_rest_minutes: u32,

    /// Start of the first slot, if the day has been fixed
    pub first_slot_at: Option<NaiveDateTime>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            name: "Tournament".to_string(),
            court_count: 4,
            slot_minutes: 30,
            default_min_rest_minutes: 30,
            first_slot_at: None,
        }
    }
}

impl TournamentConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `TOURNEY_NAME`: Tournament name (default: "Tournament")
    /// - `TOURNEY_COURTS`: Courts per slot (default: 4)
    /// - `TOURNEY_SLOT_MINUTES`: Slot length (default: 30)
    /// - `TOURNEY_MIN_REST_MINUTES`: Default rest between matches (default: 30)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            name: lookup("TOURNEY_NAME")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.name),
            court_count: lookup("TOURNEY_COURTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.court_count),
            slot_minutes: lookup("TOURNEY_SLOT_MINUTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.slot_minutes),
            default_min_rest_minutes: lookup("TOURNEY_MIN_REST_MINUTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_min_rest_minutes),
            first_slot_at: None,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Tournament name must not be empty".to_string());
        }

        if self.court_count == 0 || self.court_count > 64 {
            return Err("Court count must be between 1 and 64".to_string());
        }

        if self.slot_minutes < 5 || self.slot_minutes > 240 {
            return Err("Slot length must be between 5 and 240 minutes".to_string());
        }

        if self.default_min_rest_minutes > 24 * 60 {
            return Err("Minimum rest must not exceed one day".to_string());
        }

        Ok(())
    }

    /// Start time of a zero-based slot, when the first slot is known
    pub fn slot_start(&self, slot: u32) -> Option<NaiveDateTime> {
        let offset = Duration::minutes(i64::from(slot) * i64::from(self.slot_minutes));
        self.first_slot_at
            .and_then(|first| first.checked_add_signed(offset))
    }
}
