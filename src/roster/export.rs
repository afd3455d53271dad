//! Export and import of the persisted roster.
//!
//! Only schools, players, matches and configuration are persisted.
//! Connections and schedule snapshots are session state and never leave
//! the process through here.

use super::{
    errors::{RosterError, RosterResult},
    models::{Match, Player, School},
    state::RosterState,
};
use crate::config::TournamentConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted form of a roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterExport {
    pub schools: Vec<School>,
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
    pub config: TournamentConfig,
}

impl RosterState {
    /// Snapshot the persisted part of the roster, ordered by id
    pub fn export(&self) -> RosterExport {
        RosterExport {
            schools: self.schools.values().cloned().collect(),
            players: self.players.values().cloned().collect(),
            matches: self.matches.values().cloned().collect(),
            config: self.config.clone(),
        }
    }

    /// Build a roster from an export, checking every invariant.
    ///
    /// The import is all-or-nothing: any duplicate id, dangling reference or
    /// rank collision rejects the whole payload.
    pub fn import(export: RosterExport) -> RosterResult<Self> {
        let state = Self {
            schools: keyed(export.schools, |s| s.id, "school")?,
            players: keyed(export.players, |p| p.id, "player")?,
            matches: keyed(export.matches, |m| m.id, "match")?,
            config: export.config,
        };
        state.check_invariants()?;

        log::info!(
            "Imported roster: {} schools, {} players, {} matches",
            state.schools.len(),
            state.players.len(),
            state.matches.len()
        );
        Ok(state)
    }

    /// Serialize the export as JSON
    pub fn to_json(&self) -> RosterResult<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    /// Parse and import a JSON export. Rank strings are parsed here, once.
    pub fn from_json(json: &str) -> RosterResult<Self> {
        let export: RosterExport = serde_json::from_str(json)?;
        Self::import(export)
    }
}

fn keyed<T>(items: Vec<T>, id_of: impl Fn(&T) -> i64, what: &str) -> RosterResult<BTreeMap<i64, T>> {
    let mut map = BTreeMap::new();
    for item in items {
        let id = id_of(&item);
        if map.insert(id, item).is_some() {
            return Err(RosterError::Validation(format!("duplicate {what} id {id}")));
        }
    }
    Ok(map)
}
