//! Integration tests for match generation
//!
//! These tests draw pairings through the session and verify the generated
//! proposals: side grouping, school ordering, dual/tri qualification and
//! repeatability.

#[cfg(test)]
mod generation_tests {
    use std::collections::BTreeSet;
    use tourney_core::{
        TournamentSession,
        matching::ConnectionError,
        roster::{
            AddPlayer, AddSchool, AssignSchool, MatchType, NewPlayer, RankCode,
            SchoolConflictResolution,
        },
    };

    fn rank(raw: &str) -> RankCode {
        raw.parse().unwrap()
    }

    /// Schools 1..=3; players p1,p2 in school 1, p3,p4 in school 2,
    /// p5,p6 in school 3
    fn setup() -> TournamentSession {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut session = TournamentSession::default();
        for name in ["Alder", "Birch", "Cedar"] {
            session
                .execute(AddSchool {
                    name: name.to_string(),
                })
                .unwrap();
        }
        for (i, school) in [1, 1, 2, 2, 3, 3].into_iter().enumerate() {
            session
                .execute(AddPlayer {
                    player: NewPlayer::named(format!("p{}", i + 1)).in_school(school),
                })
                .unwrap();
        }
        session
    }

    #[test]
    fn test_dual_groups_players_by_school() {
        let mut session = setup();
        session.connect(1, 3, rank("WS1")).unwrap();
        session.connect(2, 4, rank("WS1")).unwrap();

        let matches = session.generate_matches(MatchType::Dual);
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.rank, rank("WS1"));
        assert_eq!(m.match_type, MatchType::Dual);
        assert_eq!(m.side_a, BTreeSet::from([1, 2]));
        assert_eq!(m.side_b, BTreeSet::from([3, 4]));
        assert!(m.side_c.is_none());
    }

    #[test]
    fn test_three_school_component_is_tri_only() {
        let mut session = setup();
        session.connect(1, 3, rank("MD1")).unwrap();
        session.connect(4, 5, rank("MD1")).unwrap();
        session.connect(3, 6, rank("XD1")).unwrap();

        let tri = session.generate_matches(MatchType::Tri);
        assert_eq!(tri.len(), 1);
        assert_eq!(tri[0].rank, rank("MD1"));
        assert_eq!(tri[0].schools, vec![1, 2, 3]);
        assert_eq!(tri[0].side_a, BTreeSet::from([1]));
        assert_eq!(tri[0].side_b, BTreeSet::from([3, 4]));
        assert_eq!(tri[0].side_c, Some(BTreeSet::from([5])));

        // MD1 spans three schools, so only the XD1 pairing makes a dual
        let duals = session.generate_matches(MatchType::Dual);
        assert_eq!(duals.len(), 1);
        assert_eq!(duals[0].rank, rank("XD1"));
        assert_eq!(duals[0].schools, vec![2, 3]);
    }

    #[test]
    fn test_generation_is_idempotent() {
        let mut session = setup();
        session.connect(5, 1, rank("MS2")).unwrap();
        session.connect(2, 6, rank("MS2")).unwrap();
        session.connect(4, 1, rank("WD1")).unwrap();

        let first = serde_json::to_string(&session.generate_matches(MatchType::Dual)).unwrap();
        let second = serde_json::to_string(&session.generate_matches(MatchType::Dual)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_undirected_edge_rejected() {
        let mut session = setup();
        let id = session.connect(1, 3, rank("MS1")).unwrap();
        assert_eq!(
            session.connect(3, 1, rank("MS1")),
            Err(ConnectionError::Duplicate(id))
        );
        assert!(session.connect(3, 1, rank("MS2")).is_ok());
    }

    #[test]
    fn test_moving_player_invalidates_pairings() {
        let mut session = setup();
        session.connect(1, 3, rank("MS1")).unwrap();
        session.connect(2, 5, rank("MS1")).unwrap();

        session
            .execute(AssignSchool {
                player_ids: vec![3],
                school_id: 3,
                resolution: SchoolConflictResolution::ClearConflicting,
            })
            .unwrap();

        assert_eq!(session.connections().len(), 1);
        let matches = session.generate_matches(MatchType::Dual);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].schools, vec![1, 3]);
    }

    #[test]
    fn test_accepting_proposals_marks_schedule_stale() {
        let mut session = setup();
        session.connect(1, 3, rank("MS1")).unwrap();
        let epoch = session.epoch();

        let proposals = session.generate_matches(MatchType::Dual);
        session.accept_generated(&proposals).unwrap();

        assert!(session.epoch() > epoch);
        let persisted = session.roster().matches().next().unwrap();
        assert_eq!(persisted.sides, vec![BTreeSet::from([1]), BTreeSet::from([3])]);
    }
}
