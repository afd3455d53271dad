//! Integration tests for schedule staleness
//!
//! A fake solver answers on a channel so the tests can mutate the roster
//! while a request is outstanding.

#[cfg(test)]
mod schedule_tests {
    use async_trait::async_trait;
    use std::{sync::Arc, time::Duration};
    use tokio::sync::Mutex;
    use tourney_core::{
        TournamentSession,
        roster::{AddMatches, AddPlayer, AddSchool, MatchDraft, MatchType, NewPlayer},
        schedule::{
            Epoch, ScheduleError, ScheduleRequest, ScheduleResponse, ScheduleSolver,
            SlotAssignment, SolverError, StalenessState,
            mock::{FailingSolver, RoundRobinSolver},
        },
    };

    /// Assigns every match to court 1, one slot each, after a short delay
    struct SequentialSolver {
        delay: Duration,
        seen: Arc<Mutex<Vec<Epoch>>>,
    }

    #[async_trait]
    impl ScheduleSolver for SequentialSolver {
        async fn solve(&self, request: ScheduleRequest) -> Result<ScheduleResponse, SolverError> {
            tokio::time::sleep(self.delay).await;
            self.seen.lock().await.push(request.epoch);
            Ok(ScheduleResponse {
                request_id: request.request_id,
                epoch: request.epoch,
                assignments: request
                    .matches
                    .iter()
                    .enumerate()
                    .map(|(slot, m)| SlotAssignment {
                        match_id: m.id,
                        court: 1,
                        slot: slot as u32,
                        starts_at: request.config.slot_start(slot as u32),
                    })
                    .collect(),
            })
        }
    }

    fn setup() -> TournamentSession {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut session = TournamentSession::default();
        for name in ["Alder", "Birch"] {
            session
                .execute(AddSchool {
                    name: name.to_string(),
                })
                .unwrap();
        }
        for (name, school) in [("Hana", 1), ("Iris", 2)] {
            session
                .execute(AddPlayer {
                    player: NewPlayer::named(name)
                        .in_school(school)
                        .with_ranks(["MS1".parse().unwrap()]),
                })
                .unwrap();
        }
        session
            .execute(AddMatches {
                drafts: vec![MatchDraft {
                    rank: "MS1".parse().unwrap(),
                    match_type: MatchType::Dual,
                    sides: vec![[1].into(), [2].into()],
                }],
            })
            .unwrap();
        session
    }

    fn solver() -> SequentialSolver {
        SequentialSolver {
            delay: Duration::from_millis(5),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[tokio::test]
    async fn test_fresh_after_matching_response() {
        let mut session = setup();
        let solver = solver();

        let snapshot = session.run_schedule(&solver).await.unwrap();
        assert_eq!(snapshot.assignments.len(), 1);
        assert_eq!(snapshot.assignments[0].match_id, 1);
        assert_eq!(session.staleness(), StalenessState::Fresh);
        assert_eq!(*solver.seen.lock().await, vec![session.epoch()]);
    }

    #[tokio::test]
    async fn test_mutation_while_outstanding_discards_response() {
        let mut session = setup();
        let solver = solver();

        session.run_schedule(&solver).await.unwrap();
        let accepted = session.schedule().unwrap().epoch;

        // Request goes out, then the roster changes before the answer lands
        let request = session.request_schedule();
        let pending = tokio::spawn({
            let solver = SequentialSolver {
                delay: solver.delay,
                seen: solver.seen.clone(),
            };
            async move { solver.solve(request).await }
        });
        session
            .execute(AddSchool {
                name: "Cedar".to_string(),
            })
            .unwrap();

        let result = pending.await.unwrap();
        let err = session.complete_schedule(result).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::StaleData { response_epoch, current_epoch }
                if response_epoch == accepted && current_epoch == accepted.next()
        ));
        assert_eq!(session.staleness(), StalenessState::Stale);
        // The earlier schedule is still readable
        assert_eq!(session.schedule().unwrap().epoch, accepted);

        // A fresh request at the new epoch succeeds
        session.run_schedule(&solver).await.unwrap();
        assert_eq!(session.staleness(), StalenessState::Fresh);
    }

    #[tokio::test]
    async fn test_round_robin_spreads_over_courts() {
        let mut session = setup();
        session
            .execute(AddMatches {
                drafts: vec![MatchDraft {
                    rank: "MS1".parse().unwrap(),
                    match_type: MatchType::Dual,
                    sides: vec![[1].into(), [2].into()],
                }],
            })
            .unwrap();

        let snapshot = session.run_schedule(&RoundRobinSolver).await.unwrap();
        let courts: Vec<u32> = snapshot.assignments.iter().map(|a| a.court).collect();
        assert_eq!(courts, vec![1, 2]);
        assert!(snapshot.assignments.iter().all(|a| a.slot == 0));
        assert_eq!(snapshot.assignment_for(2).map(|a| a.court), Some(2));
    }

    #[tokio::test]
    async fn test_any_mutation_marks_stale() {
        let mut session = setup();
        session.run_schedule(&solver()).await.unwrap();

        session
            .execute(AddPlayer {
                player: NewPlayer::named("Juno").in_school(1),
            })
            .unwrap();
        assert_eq!(session.staleness(), StalenessState::Stale);
    }

    #[tokio::test]
    async fn test_solver_failure_keeps_stale() {
        let mut session = setup();
        let solver = FailingSolver(SolverError::Unavailable("connection refused".to_string()));
        let err = session.run_schedule(&solver).await.unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Solver(SolverError::Unavailable(_))
        ));
        assert_eq!(session.staleness(), StalenessState::Stale);
        assert!(session.schedule().is_none());
        assert!(session.tracker().last_error().is_some());
    }
}
