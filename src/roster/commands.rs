//! Roster commands and the pure `(state, command) -> state` transition.

use super::{
    bulk::{BulkReport, DeleteReport, PlayerOutcome, SchoolConflictResolution},
    conflicts::RankAssignMode,
    errors::RosterResult,
    export::RosterExport,
    models::{MatchDraft, MatchId, NewPlayer, PlayerId, PlayerUpdate, SchoolId},
    rank::RankCode,
    state::RosterState,
};
use crate::config::TournamentConfig;
use enum_dispatch::enum_dispatch;

/// A command that mutates the roster in place.
///
/// Implementations may assume they run against a scratch copy: on error the
/// copy is discarded, so partial writes never escape.
#[enum_dispatch]
pub trait RosterMutation {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome>;
}

/// What a successful command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    SchoolAdded(SchoolId),
    SchoolRenamed(SchoolId),
    SchoolDeleted(SchoolId),
    PlayerAdded(PlayerOutcome),
    PlayerUpdated(PlayerOutcome),
    PlayersDeleted(DeleteReport),
    SchoolAssigned(BulkReport),
    RanksAssigned(BulkReport),
    MatchesAdded(Vec<MatchId>),
    MatchDeleted(MatchId),
    ConfigUpdated,
    Imported,
}

impl MutationOutcome {
    /// Whether the roster or its matches changed. No-op bulk calls and
    /// edits that only hit collisions report `false`.
    pub fn changed(&self) -> bool {
        match self {
            MutationOutcome::PlayerAdded(outcome) | MutationOutcome::PlayerUpdated(outcome) => {
                outcome.changed
            }
            MutationOutcome::PlayersDeleted(report) => !report.deleted.is_empty(),
            MutationOutcome::SchoolAssigned(report) | MutationOutcome::RanksAssigned(report) => {
                report.changed()
            }
            MutationOutcome::MatchesAdded(ids) => !ids.is_empty(),
            MutationOutcome::SchoolAdded(_)
            | MutationOutcome::SchoolRenamed(_)
            | MutationOutcome::SchoolDeleted(_)
            | MutationOutcome::MatchDeleted(_)
            | MutationOutcome::ConfigUpdated
            | MutationOutcome::Imported => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddSchool {
    pub name: String,
}

impl RosterMutation for AddSchool {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome> {
        roster.add_school(&self.name).map(MutationOutcome::SchoolAdded)
    }
}

#[derive(Debug, Clone)]
pub struct RenameSchool {
    pub school_id: SchoolId,
    pub name: String,
}

impl RosterMutation for RenameSchool {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome> {
        roster.rename_school(self.school_id, &self.name)?;
        Ok(MutationOutcome::SchoolRenamed(self.school_id))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteSchool {
    pub school_id: SchoolId,
}

impl RosterMutation for DeleteSchool {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome> {
        roster.bulk().delete_school(self.school_id)?;
        Ok(MutationOutcome::SchoolDeleted(self.school_id))
    }
}

#[derive(Debug, Clone)]
pub struct AddPlayer {
    pub player: NewPlayer,
}

impl RosterMutation for AddPlayer {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome> {
        roster.add_player(self.player).map(MutationOutcome::PlayerAdded)
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePlayer {
    pub player_id: PlayerId,
    pub update: PlayerUpdate,
}

impl RosterMutation for UpdatePlayer {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome> {
        roster
            .update_player(self.player_id, self.update)
            .map(MutationOutcome::PlayerUpdated)
    }
}

#[derive(Debug, Clone)]
pub struct DeletePlayers {
    pub player_ids: Vec<PlayerId>,
}

impl RosterMutation for DeletePlayers {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome> {
        Ok(MutationOutcome::PlayersDeleted(
            roster.bulk().delete_players(&self.player_ids),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct AssignSchool {
    pub player_ids: Vec<PlayerId>,
    pub school_id: SchoolId,
    pub resolution: SchoolConflictResolution,
}

impl RosterMutation for AssignSchool {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome> {
        roster
            .bulk()
            .assign_school(&self.player_ids, self.school_id, self.resolution)
            .map(MutationOutcome::SchoolAssigned)
    }
}

#[derive(Debug, Clone)]
pub struct AssignRanks {
    pub player_ids: Vec<PlayerId>,
    pub ranks: Vec<RankCode>,
    pub mode: RankAssignMode,
    pub auto_resolve_conflicts: bool,
}

impl RosterMutation for AssignRanks {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome> {
        roster
            .bulk()
            .bulk_assign_ranks(
                &self.player_ids,
                &self.ranks,
                self.mode,
                self.auto_resolve_conflicts,
            )
            .map(MutationOutcome::RanksAssigned)
    }
}

/// Persist several matches at once; one invalid draft rejects them all
#[derive(Debug, Clone)]
pub struct AddMatches {
    pub drafts: Vec<MatchDraft>,
}

impl RosterMutation for AddMatches {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome> {
        let ids = self
            .drafts
            .into_iter()
            .map(|draft| roster.add_match(draft))
            .collect::<RosterResult<Vec<_>>>()?;
        Ok(MutationOutcome::MatchesAdded(ids))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteMatch {
    pub match_id: MatchId,
}

impl RosterMutation for DeleteMatch {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome> {
        roster.delete_match(self.match_id)?;
        Ok(MutationOutcome::MatchDeleted(self.match_id))
    }
}

#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub config: TournamentConfig,
}

impl RosterMutation for UpdateConfig {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome> {
        roster.set_config(self.config)?;
        Ok(MutationOutcome::ConfigUpdated)
    }
}

/// Replace the whole roster with an imported one
#[derive(Debug, Clone)]
pub struct ImportRoster {
    pub export: RosterExport,
}

impl RosterMutation for ImportRoster {
    fn execute(self, roster: &mut RosterState) -> RosterResult<MutationOutcome> {
        *roster = RosterState::import(self.export)?;
        Ok(MutationOutcome::Imported)
    }
}

/// Every supported roster mutation
#[enum_dispatch(RosterMutation)]
#[derive(Debug, Clone)]
pub enum RosterCommand {
    AddSchool,
    RenameSchool,
    DeleteSchool,
    AddPlayer,
    UpdatePlayer,
    DeletePlayers,
    AssignSchool,
    AssignRanks,
    AddMatches,
    DeleteMatch,
    UpdateConfig,
    ImportRoster,
}

impl RosterState {
    /// Apply a command without touching `self`.
    ///
    /// Returns the next state and the outcome on success. On error the input
    /// state is unchanged, which makes every command atomic.
    pub fn apply(&self, command: impl Into<RosterCommand>) -> RosterResult<(RosterState, MutationOutcome)> {
        let mut next = self.clone();
        let outcome = command.into().execute(&mut next)?;
        Ok((next, outcome))
    }
}
