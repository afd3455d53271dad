//! The roster aggregate: schools, players, persisted matches and config.

use super::{
    bulk::{BulkMutationEngine, PlayerOutcome, SchoolConflictResolution},
    conflicts::{ConflictDetector, RankAssignMode, RankConflict},
    errors::{RosterError, RosterResult},
    ledger::RankLedger,
    models::{
        AvailabilityWindow, Match, MatchDraft, MatchId, NewPlayer, Player, PlayerId,
        PlayerUpdate, School, SchoolId,
    },
    rank::RankCode,
};
use crate::config::TournamentConfig;
use std::collections::{BTreeMap, BTreeSet};

/// Single-owner roster aggregate.
///
/// New ids are one past the highest id in use, so the state carries no
/// counters beyond its own contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterState {
    pub(crate) schools: BTreeMap<SchoolId, School>,
    pub(crate) players: BTreeMap<PlayerId, Player>,
    pub(crate) matches: BTreeMap<MatchId, Match>,
    pub(crate) config: TournamentConfig,
}

impl RosterState {
    /// Create an empty roster with the given configuration
    pub fn new(config: TournamentConfig) -> RosterResult<Self> {
        config.validate().map_err(RosterError::Validation)?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn schools(&self) -> impl Iterator<Item = &School> {
        self.schools.values()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.values()
    }

    pub fn school(&self, school_id: SchoolId) -> Option<&School> {
        self.schools.get(&school_id)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.get(&player_id)
    }

    pub fn get_match(&self, match_id: MatchId) -> Option<&Match> {
        self.matches.get(&match_id)
    }

    /// Players currently belonging to a school
    pub fn players_in_school(&self, school_id: SchoolId) -> impl Iterator<Item = &Player> {
        self.players
            .values()
            .filter(move |p| p.school_id == Some(school_id))
    }

    /// Rebuild the rank ledger from current player state
    pub fn ledger(&self) -> RankLedger {
        RankLedger::build(self.players.values())
    }

    /// Bulk mutation entry point
    pub fn bulk(&mut self) -> BulkMutationEngine<'_> {
        BulkMutationEngine::new(self)
    }

    /// Preview collisions of moving players into a school under `resolution`
    pub fn preview_school_reassignment(
        &self,
        player_ids: &[PlayerId],
        target_school_id: SchoolId,
        resolution: SchoolConflictResolution,
    ) -> RosterResult<Vec<RankConflict>> {
        if !self.schools.contains_key(&target_school_id) {
            return Err(RosterError::SchoolNotFound(target_school_id));
        }
        let ledger = self.ledger();
        ConflictDetector::new(&self.players, &ledger)
            .for_school_reassignment(player_ids, target_school_id, resolution)
    }

    /// Preview collisions of a bulk rank assignment
    pub fn preview_rank_assignment(
        &self,
        player_ids: &[PlayerId],
        ranks: &[RankCode],
        mode: RankAssignMode,
    ) -> RosterResult<Vec<RankConflict>> {
        let ledger = self.ledger();
        ConflictDetector::new(&self.players, &ledger).for_rank_bulk_assign(player_ids, ranks, mode)
    }

    /// Add a school
    pub fn add_school(&mut self, name: &str) -> RosterResult<SchoolId> {
        let name = self.validated_school_name(name, None)?;
        let id = next_id(&self.schools)?;
        self.schools.insert(id, School { id, name });
        Ok(id)
    }

    /// Rename a school
    pub fn rename_school(&mut self, school_id: SchoolId, name: &str) -> RosterResult<()> {
        if !self.schools.contains_key(&school_id) {
            return Err(RosterError::SchoolNotFound(school_id));
        }
        let name = self.validated_school_name(name, Some(school_id))?;
        if let Some(school) = self.schools.get_mut(&school_id) {
            school.name = name;
        }
        Ok(())
    }

    /// Add a player. Ranks already held by another player of the same
    /// school are dropped and reported in the outcome.
    pub fn add_player(&mut self, new_player: NewPlayer) -> RosterResult<PlayerOutcome> {
        let name = validated_name(&new_player.name, "Player")?;
        self.validate_school_ref(new_player.school_id)?;
        validate_windows(&new_player.availability)?;

        let id = next_id(&self.players)?;
        let mut ranks = new_player.ranks;
        let mut conflicts = Vec::new();
        if let Some(school_id) = new_player.school_id {
            conflicts = ConflictDetector::colliding_ranks(&self.ledger(), id, school_id, &ranks);
            for rank in &conflicts {
                ranks.remove(rank);
            }
        }

        self.players.insert(
            id,
            Player {
                id,
                name,
                school_id: new_player.school_id,
                ranks,
                availability: new_player.availability,
                min_rest_minutes: new_player.min_rest_minutes,
            },
        );

        Ok(PlayerOutcome {
            changed: true,
            conflicts,
            ..PlayerOutcome::unchanged(id)
        })
    }

    /// Edit a single player. A school or rank change that would collide
    /// drops the colliding ranks and reports them; the rest applies.
    pub fn update_player(
        &mut self,
        player_id: PlayerId,
        update: PlayerUpdate,
    ) -> RosterResult<PlayerOutcome> {
        let current = self
            .players
            .get(&player_id)
            .ok_or(RosterError::PlayerNotFound(player_id))?;

        let mut next = current.clone();
        if let Some(name) = &update.name {
            next.name = validated_name(name, "Player")?;
        }
        if let Some(school_id) = update.school_id {
            self.validate_school_ref(school_id)?;
            next.school_id = school_id;
        }
        if let Some(ranks) = update.ranks {
            next.ranks = ranks;
        }
        if let Some(availability) = update.availability {
            validate_windows(&availability)?;
            next.availability = availability;
        }
        if let Some(min_rest) = update.min_rest_minutes {
            next.min_rest_minutes = min_rest;
        }

        let mut conflicts = Vec::new();
        if let Some(school_id) = next.school_id {
            conflicts =
                ConflictDetector::colliding_ranks(&self.ledger(), player_id, school_id, &next.ranks);
            for rank in &conflicts {
                next.ranks.remove(rank);
            }
        }

        let changed = *current != next;
        self.players.insert(player_id, next);

        Ok(PlayerOutcome {
            changed,
            conflicts,
            ..PlayerOutcome::unchanged(player_id)
        })
    }

    /// Persist a match proposal
    pub fn add_match(&mut self, draft: MatchDraft) -> RosterResult<MatchId> {
        self.validate_match_sides(&draft.sides, draft.match_type.side_count())?;
        let id = next_id(&self.matches)?;
        self.matches.insert(
            id,
            Match {
                id,
                rank: draft.rank,
                match_type: draft.match_type,
                sides: draft.sides,
            },
        );
        Ok(id)
    }

    /// Remove a persisted match
    pub fn delete_match(&mut self, match_id: MatchId) -> RosterResult<Match> {
        self.matches
            .remove(&match_id)
            .ok_or(RosterError::MatchNotFound(match_id))
    }

    /// Replace the tournament configuration
    pub fn set_config(&mut self, config: TournamentConfig) -> RosterResult<()> {
        config.validate().map_err(RosterError::Validation)?;
        self.config = config;
        Ok(())
    }

    /// Verify every roster invariant.
    ///
    /// Field-level problems come back as validation errors; dangling school
    /// references and duplicate rank holders are invariant violations.
    pub fn check_invariants(&self) -> RosterResult<()> {
        self.config.validate().map_err(RosterError::Validation)?;

        let mut names = BTreeSet::new();
        for school in self.schools.values() {
            let name = validated_name(&school.name, "School")?;
            if !names.insert(name.to_lowercase()) {
                return Err(RosterError::Validation(format!(
                    "duplicate school name {name:?}"
                )));
            }
        }

        for player in self.players.values() {
            validated_name(&player.name, "Player")?;
            validate_windows(&player.availability)?;
            if let Some(school_id) = player.school_id
                && !self.schools.contains_key(&school_id)
            {
                return Err(RosterError::InvariantViolation(format!(
                    "player {} references missing school {}",
                    player.id, school_id
                )));
            }
        }

        if let Some(duplicate) = RankLedger::duplicates(self.players.values()).first() {
            return Err(RosterError::InvariantViolation(format!(
                "rank {} held by players {:?} in school {}",
                duplicate.rank, duplicate.holders, duplicate.school_id
            )));
        }

        for m in self.matches.values() {
            self.validate_match_sides(&m.sides, m.match_type.side_count())?;
        }

        Ok(())
    }

    fn validated_school_name(&self, name: &str, exclude: Option<SchoolId>) -> RosterResult<String> {
        let name = validated_name(name, "School")?;
        let taken = self
            .schools
            .values()
            .any(|s| Some(s.id) != exclude && s.name.eq_ignore_ascii_case(&name));
        if taken {
            return Err(RosterError::Validation(format!(
                "school name {name:?} is already in use"
            )));
        }
        Ok(name)
    }

    fn validate_school_ref(&self, school_id: Option<SchoolId>) -> RosterResult<()> {
        match school_id {
            Some(id) if !self.schools.contains_key(&id) => Err(RosterError::SchoolNotFound(id)),
            _ => Ok(()),
        }
    }

    fn validate_match_sides(
        &self,
        sides: &[BTreeSet<PlayerId>],
        expected: usize,
    ) -> RosterResult<()> {
        if sides.len() != expected {
            return Err(RosterError::Validation(format!(
                "expected {expected} sides, got {}",
                sides.len()
            )));
        }

        let mut seen = BTreeSet::new();
        for side in sides {
            if side.is_empty() {
                return Err(RosterError::Validation("match side is empty".to_string()));
            }
            for player_id in side {
                if !self.players.contains_key(player_id) {
                    return Err(RosterError::PlayerNotFound(*player_id));
                }
                if !seen.insert(*player_id) {
                    return Err(RosterError::Validation(format!(
                        "player {player_id} appears on more than one side"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn next_id<V>(map: &BTreeMap<i64, V>) -> RosterResult<i64> {
    match map.keys().next_back() {
        None => Ok(1),
        Some(id) => id
            .checked_add(1)
            .ok_or_else(|| RosterError::Validation(format!("no id left after {id}"))),
    }
}

fn validated_name(name: &str, what: &str) -> RosterResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RosterError::Validation(format!("{what} name must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn validate_windows(windows: &[AvailabilityWindow]) -> RosterResult<()> {
    match windows.iter().find(|w| !w.is_valid()) {
        Some(w) => Err(RosterError::Validation(format!(
            "availability window {} - {} ends before it starts",
            w.start, w.end
        ))),
        None => Ok(()),
    }
}
