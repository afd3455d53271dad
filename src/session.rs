//! Interactive session: the single writer over roster, pairing graph and
//! schedule state.

use crate::{
    config::TournamentConfig,
    matching::{
        ConnectionError, ConnectionGraph, ConnectionId, ConnectionResult, Endpoint,
        GeneratedMatch, MatchGenerator,
    },
    roster::{
        AddMatches, ImportRoster, MatchType, MutationOutcome, PlayerId, RankAssignMode,
        RankCode, RankConflict, RosterCommand, RosterExport, RosterResult, RosterState,
        SchoolConflictResolution, SchoolId,
    },
    schedule::{
        Epoch, ScheduleRequest, ScheduleResponse, ScheduleResult, ScheduleSnapshot,
        ScheduleSolver, ScheduleStalenessTracker, SolverError, StalenessState,
    },
};

/// Owns the roster, the session's pairing graph and the schedule tracker.
///
/// Every roster mutation goes through [`TournamentSession::execute`], which
/// swaps in the new state, advances the schedule epoch and drops pairings
/// that no longer match the roster.
#[derive(Debug, Clone, Default)]
pub struct TournamentSession {
    roster: RosterState,
    connections: ConnectionGraph,
    tracker: ScheduleStalenessTracker,
}

impl TournamentSession {
    pub fn new(config: TournamentConfig) -> RosterResult<Self> {
        Ok(Self::from_roster(RosterState::new(config)?))
    }

    /// Start a session over an existing roster. No schedule is known yet.
    pub fn from_roster(roster: RosterState) -> Self {
        Self {
            roster,
            connections: ConnectionGraph::new(),
            tracker: ScheduleStalenessTracker::new(),
        }
    }

    pub fn roster(&self) -> &RosterState {
        &self.roster
    }

    pub fn connections(&self) -> &ConnectionGraph {
        &self.connections
    }

    pub fn tracker(&self) -> &ScheduleStalenessTracker {
        &self.tracker
    }

    pub fn epoch(&self) -> Epoch {
        self.tracker.epoch()
    }

    pub fn staleness(&self) -> StalenessState {
        self.tracker.state()
    }

    /// Last accepted schedule, possibly stale
    pub fn schedule(&self) -> Option<&ScheduleSnapshot> {
        self.tracker.snapshot()
    }

    /// Apply a roster command atomically
    pub fn execute(&mut self, command: impl Into<RosterCommand>) -> RosterResult<MutationOutcome> {
        let (next, outcome) = self.roster.apply(command)?;
        self.roster = next;

        if outcome.changed() {
            let epoch = self.tracker.mark_mutated();
            if matches!(outcome, MutationOutcome::Imported) {
                self.connections.clear();
            } else {
                self.connections.retain_valid(&self.roster);
            }
            log::debug!("Roster mutation committed at {epoch}");
        }
        Ok(outcome)
    }

    pub fn preview_school_reassignment(
        &self,
        player_ids: &[PlayerId],
        target_school_id: SchoolId,
        resolution: SchoolConflictResolution,
    ) -> RosterResult<Vec<RankConflict>> {
        self.roster
            .preview_school_reassignment(player_ids, target_school_id, resolution)
    }

    pub fn preview_rank_assignment(
        &self,
        player_ids: &[PlayerId],
        ranks: &[RankCode],
        mode: RankAssignMode,
    ) -> RosterResult<Vec<RankConflict>> {
        self.roster.preview_rank_assignment(player_ids, ranks, mode)
    }

    /// Draw a pairing between two players for a rank. Both players must
    /// belong to a school; the schools must differ.
    pub fn connect(
        &mut self,
        from_player: PlayerId,
        to_player: PlayerId,
        rank: RankCode,
    ) -> ConnectionResult<ConnectionId> {
        let from = self.endpoint(from_player)?;
        let to = self.endpoint(to_player)?;
        self.connections.add_connection(from, to, rank)
    }

    pub fn disconnect(&mut self, connection_id: ConnectionId) -> ConnectionResult<()> {
        self.connections.remove_connection(connection_id).map(|_| ())
    }

    fn endpoint(&self, player_id: PlayerId) -> ConnectionResult<Endpoint> {
        let player = self
            .roster
            .player(player_id)
            .ok_or(ConnectionError::UnknownPlayer(player_id))?;
        let school_id = player
            .school_id
            .ok_or(ConnectionError::Unaffiliated(player_id))?;
        Ok(Endpoint::new(player_id, school_id))
    }

    /// Propose matches from the current pairings. Nothing is persisted.
    pub fn generate_matches(&self, match_type: MatchType) -> Vec<GeneratedMatch> {
        MatchGenerator::new(&self.connections).generate(match_type)
    }

    /// Persist generated proposals as matches, all or none
    pub fn accept_generated(&mut self, proposals: &[GeneratedMatch]) -> RosterResult<MutationOutcome> {
        self.execute(AddMatches {
            drafts: proposals.iter().map(GeneratedMatch::to_draft).collect(),
        })
    }

    pub fn export(&self) -> RosterExport {
        self.roster.export()
    }

    /// Replace the roster. Pairings are discarded.
    pub fn import(&mut self, export: RosterExport) -> RosterResult<MutationOutcome> {
        self.execute(ImportRoster { export })
    }

    pub fn import_json(&mut self, json: &str) -> RosterResult<MutationOutcome> {
        let export: RosterExport = serde_json::from_str(json)?;
        self.import(export)
    }

    /// Build a solver request for the current model.
    ///
    /// The session may keep mutating while the request is outstanding;
    /// hand the answer to [`TournamentSession::complete_schedule`].
    pub fn request_schedule(&self) -> ScheduleRequest {
        ScheduleRequest::from_roster(&self.roster, self.tracker.begin_request())
    }

    /// Apply the solver's answer. A response for an outdated epoch is
    /// discarded with `ScheduleError::StaleData`.
    pub fn complete_schedule(
        &mut self,
        result: Result<ScheduleResponse, SolverError>,
    ) -> ScheduleResult<&ScheduleSnapshot> {
        match result {
            Ok(response) => self.tracker.accept(response),
            Err(error) => Err(self.tracker.reject(error)),
        }
    }

    /// Request, solve and apply in one call
    pub async fn run_schedule(
        &mut self,
        solver: &dyn ScheduleSolver,
    ) -> ScheduleResult<&ScheduleSnapshot> {
        let request = self.request_schedule();
        log::debug!(
            "Requesting schedule {} for {} match(es) at {}",
            request.request_id,
            request.matches.len(),
            request.epoch
        );
        let result = solver.solve(request).await;
        self.complete_schedule(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        roster::{AddPlayer, AddSchool, DeletePlayers, NewPlayer, RosterError},
        schedule::{ScheduleError, solver::mock::RoundRobinSolver},
    };

    fn rank(raw: &str) -> RankCode {
        raw.parse().unwrap()
    }

    fn session_with_two_schools() -> TournamentSession {
        let mut session = TournamentSession::default();
        for name in ["Alder", "Birch"] {
            session
                .execute(AddSchool {
                    name: name.to_string(),
                })
                .unwrap();
        }
        for (name, school, held) in [("P1", 1, "WS1"), ("P2", 1, "WS2"), ("P3", 2, "WS1"), ("P4", 2, "WS2")] {
            session
                .execute(AddPlayer {
                    player: NewPlayer::named(name)
                        .in_school(school)
                        .with_ranks([rank(held)]),
                })
                .unwrap();
        }
        session
    }

    #[test]
    fn test_mutations_advance_epoch() {
        let mut session = session_with_two_schools();
        assert_eq!(session.epoch(), Epoch(6));

        // No-op delete keeps the epoch
        session
            .execute(DeletePlayers {
                player_ids: vec![99],
            })
            .unwrap();
        assert_eq!(session.epoch(), Epoch(6));

        // Failed command keeps the epoch
        let err = session
            .execute(AddSchool {
                name: " ".to_string(),
            })
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.epoch(), Epoch(6));
    }

    #[test]
    fn test_connect_resolves_schools() {
        let mut session = session_with_two_schools();
        assert_eq!(
            session.connect(1, 2, rank("WS1")),
            Err(ConnectionError::SameSchool(1))
        );
        assert_eq!(
            session.connect(1, 42, rank("WS1")),
            Err(ConnectionError::UnknownPlayer(42))
        );

        let id = session.connect(1, 3, rank("WS1")).unwrap();
        let epoch = session.epoch();
        session.disconnect(id).unwrap();
        // Pairing edits are not solver input
        assert_eq!(session.epoch(), epoch);
    }

    #[test]
    fn test_unaffiliated_player_cannot_connect() {
        let mut session = session_with_two_schools();
        session
            .execute(AddPlayer {
                player: NewPlayer::named("Free agent"),
            })
            .unwrap();
        assert_eq!(
            session.connect(5, 3, rank("MS1")),
            Err(ConnectionError::Unaffiliated(5))
        );
    }

    #[test]
    fn test_accept_generated_persists_matches() {
        let mut session = session_with_two_schools();
        session.connect(1, 3, rank("WS1")).unwrap();
        session.connect(2, 4, rank("WS1")).unwrap();

        let proposals = session.generate_matches(MatchType::Dual);
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].side_a, std::collections::BTreeSet::from([1, 2]));
        assert_eq!(proposals[0].side_b, std::collections::BTreeSet::from([3, 4]));
        let outcome = session.accept_generated(&proposals).unwrap();
        assert_eq!(outcome, MutationOutcome::MatchesAdded(vec![1]));
        assert_eq!(session.roster().matches().count(), 1);
    }

    #[test]
    fn test_deleting_player_drops_connections() {
        let mut session = session_with_two_schools();
        session.connect(1, 3, rank("WS1")).unwrap();
        session
            .execute(DeletePlayers {
                player_ids: vec![3],
            })
            .unwrap();
        assert!(session.connections().is_empty());
    }

    #[test]
    fn test_import_clears_connections() {
        let mut session = session_with_two_schools();
        session.connect(1, 3, rank("WS1")).unwrap();
        let export = session.export();
        session.import(export).unwrap();
        assert!(session.connections().is_empty());

        let err = session.import_json("{").unwrap_err();
        assert!(matches!(err, RosterError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_run_schedule_goes_fresh() {
        let mut session = session_with_two_schools();
        assert_eq!(session.staleness(), StalenessState::Stale);

        let snapshot = session.run_schedule(&RoundRobinSolver).await.unwrap();
        assert_eq!(snapshot.epoch, Epoch(6));
        assert_eq!(session.staleness(), StalenessState::Fresh);
    }

    #[test]
    fn test_response_for_old_epoch_is_discarded() {
        let mut session = session_with_two_schools();
        let request = session.request_schedule();
        session
            .execute(AddSchool {
                name: "Cedar".to_string(),
            })
            .unwrap();

        let response = ScheduleResponse {
            request_id: request.request_id,
            epoch: request.epoch,
            assignments: Vec::new(),
        };
        let err = session.complete_schedule(Ok(response)).unwrap_err();
        assert!(matches!(err, ScheduleError::StaleData { .. }));
        assert_eq!(session.staleness(), StalenessState::Stale);
        assert!(session.schedule().is_none());
    }
}
