//! Rank collision detection for proposed roster mutations.
//!
//! Detection is read-only: it works on a private copy of the ledger, so
//! previews can be requested as often as the caller likes.

use super::{
    bulk::SchoolConflictResolution,
    errors::{RosterError, RosterResult},
    ledger::RankLedger,
    models::{Player, PlayerId, SchoolId},
    rank::RankCode,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// How a bulk rank assignment combines with a player's current ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankAssignMode {
    /// Union the ranks into each player's set
    Add,
    /// Replace each player's set
    Set,
    /// Subtract the ranks from each player's set
    Remove,
}

/// Ranks a player cannot take because another player of the same school
/// already holds them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankConflict {
    pub player_id: PlayerId,
    pub player_name: String,
    pub conflicting_ranks: Vec<RankCode>,
}

impl std::fmt::Display for RankConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ranks: Vec<String> = self.conflicting_ranks.iter().map(ToString::to_string).collect();
        write!(f, "{} already taken: {}", self.player_name, ranks.join(", "))
    }
}

/// Computes rank collisions against a ledger
pub struct ConflictDetector<'a> {
    players: &'a BTreeMap<PlayerId, Player>,
    ledger: &'a RankLedger,
}

impl<'a> ConflictDetector<'a> {
    pub fn new(players: &'a BTreeMap<PlayerId, Player>, ledger: &'a RankLedger) -> Self {
        Self { players, ledger }
    }

    /// Ranks in `ranks` already held in `school_id` by someone other than `player_id`
    pub fn colliding_ranks<'r>(
        ledger: &RankLedger,
        player_id: PlayerId,
        school_id: SchoolId,
        ranks: impl IntoIterator<Item = &'r RankCode>,
    ) -> Vec<RankCode> {
        ranks
            .into_iter()
            .filter(|rank| {
                ledger
                    .holder(school_id, **rank)
                    .is_some_and(|holder| holder != player_id)
            })
            .copied()
            .collect()
    }

    /// Conflicts from moving `player_ids` into `target_school_id`.
    ///
    /// Players are evaluated in batch order; a player earlier in the batch
    /// occupies the ranks it brings along, so two movers holding the same
    /// rank collide with each other. Under
    /// [`SchoolConflictResolution::ProceedAsIs`] a colliding mover stays
    /// where it is and occupies nothing in the target school.
    pub fn for_school_reassignment(
        &self,
        player_ids: &[PlayerId],
        target_school_id: SchoolId,
        resolution: SchoolConflictResolution,
    ) -> RosterResult<Vec<RankConflict>> {
        let mut working = self.ledger.clone();
        let mut conflicts = Vec::new();

        for player in self.lookup(player_ids)? {
            let colliding =
                Self::colliding_ranks(&working, player.id, target_school_id, &player.ranks);
            let blocked =
                !colliding.is_empty() && resolution == SchoolConflictResolution::ProceedAsIs;

            if !blocked {
                working.release_player(player);
                for rank in player.ranks.iter().filter(|r| !colliding.contains(r)) {
                    working.claim(target_school_id, *rank, player.id);
                }
            }

            if !colliding.is_empty() {
                conflicts.push(RankConflict {
                    player_id: player.id,
                    player_name: player.name.clone(),
                    conflicting_ranks: colliding,
                });
            }
        }

        Ok(conflicts)
    }

    /// Conflicts from assigning `candidate_ranks` to `player_ids`, each
    /// evaluated against the player's current school. Unaffiliated players
    /// never conflict.
    pub fn for_rank_bulk_assign(
        &self,
        player_ids: &[PlayerId],
        candidate_ranks: &[RankCode],
        mode: RankAssignMode,
    ) -> RosterResult<Vec<RankConflict>> {
        let players = self.lookup(player_ids)?;
        if mode == RankAssignMode::Remove {
            return Ok(Vec::new());
        }

        let candidates: BTreeSet<RankCode> = candidate_ranks.iter().copied().collect();
        let mut working = self.ledger.clone();
        let mut conflicts = Vec::new();

        for player in players {
            let Some(school_id) = player.school_id else {
                continue;
            };

            let colliding = Self::colliding_ranks(&working, player.id, school_id, &candidates);

            if mode == RankAssignMode::Set {
                for rank in player.ranks.difference(&candidates) {
                    working.release(school_id, *rank, player.id);
                }
            }
            for rank in candidates.iter().filter(|r| !colliding.contains(r)) {
                working.claim(school_id, *rank, player.id);
            }

            if !colliding.is_empty() {
                conflicts.push(RankConflict {
                    player_id: player.id,
                    player_name: player.name.clone(),
                    conflicting_ranks: colliding,
                });
            }
        }

        Ok(conflicts)
    }

    fn lookup(&self, player_ids: &[PlayerId]) -> RosterResult<Vec<&'a Player>> {
        dedup_ids(player_ids)
            .into_iter()
            .map(|id| self.players.get(&id).ok_or(RosterError::PlayerNotFound(id)))
            .collect()
    }
}

/// Drop repeated ids, keeping first-seen order
pub(crate) fn dedup_ids(ids: &[PlayerId]) -> Vec<PlayerId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: SchoolConflictResolution = SchoolConflictResolution::ClearConflicting;

    fn rank(raw: &str) -> RankCode {
        raw.parse().unwrap()
    }

    fn roster(entries: &[(PlayerId, Option<SchoolId>, &[&str])]) -> BTreeMap<PlayerId, Player> {
        entries
            .iter()
            .map(|(id, school_id, ranks)| {
                (
                    *id,
                    Player {
                        id: *id,
                        name: format!("p{id}"),
                        school_id: *school_id,
                        ranks: ranks.iter().map(|r| rank(r)).collect(),
                        availability: vec![],
                        min_rest_minutes: None,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_school_reassignment_reports_only_foreign_holders() {
        let players = roster(&[
            (1, Some(1), &["MS1", "MD1"]),
            (2, Some(2), &["MS1", "WS2"]),
            (3, Some(2), &["XD1"]),
        ]);
        let ledger = RankLedger::build(players.values());
        let detector = ConflictDetector::new(&players, &ledger);

        let conflicts = detector.for_school_reassignment(&[2], 1, CLEAR).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].player_id, 2);
        assert_eq!(conflicts[0].player_name, "p2");
        assert_eq!(conflicts[0].conflicting_ranks, vec![rank("MS1")]);

        // Moving within the same school never collides with yourself
        assert!(detector.for_school_reassignment(&[3], 2, CLEAR).unwrap().is_empty());
    }

    #[test]
    fn test_school_reassignment_movers_collide_with_each_other() {
        let players = roster(&[(1, Some(1), &["WS1"]), (2, Some(2), &["WS1"])]);
        let ledger = RankLedger::build(players.values());
        let detector = ConflictDetector::new(&players, &ledger);

        let conflicts = detector.for_school_reassignment(&[1, 2], 3, CLEAR).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].player_id, 2);
    }

    #[test]
    fn test_school_reassignment_blocked_mover_claims_nothing() {
        let players = roster(&[
            (1, Some(1), &["MS1"]),
            (2, Some(2), &["MS1", "WS1"]),
            (3, Some(3), &["WS1"]),
        ]);
        let ledger = RankLedger::build(players.values());
        let detector = ConflictDetector::new(&players, &ledger);

        // Player 2 keeps WS1 out of school 1 only if it actually moves
        let cleared = detector.for_school_reassignment(&[2, 3], 1, CLEAR).unwrap();
        assert_eq!(cleared.iter().map(|c| c.player_id).collect::<Vec<_>>(), vec![2, 3]);

        let as_is = detector
            .for_school_reassignment(&[2, 3], 1, SchoolConflictResolution::ProceedAsIs)
            .unwrap();
        assert_eq!(as_is.len(), 1);
        assert_eq!(as_is[0].player_id, 2);
        assert_eq!(as_is[0].conflicting_ranks, vec![rank("MS1")]);
    }

    #[test]
    fn test_rank_bulk_assign_against_current_school() {
        let players = roster(&[
            (1, Some(1), &["MS1"]),
            (2, Some(1), &[]),
            (3, Some(2), &[]),
            (4, None, &[]),
        ]);
        let ledger = RankLedger::build(players.values());
        let detector = ConflictDetector::new(&players, &ledger);

        let conflicts = detector
            .for_rank_bulk_assign(&[2, 3, 4], &[rank("MS1")], RankAssignMode::Add)
            .unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].player_id, 2);

        let none = detector
            .for_rank_bulk_assign(&[2], &[rank("MS1")], RankAssignMode::Remove)
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_rank_bulk_assign_set_empty_never_conflicts() {
        let players = roster(&[(1, Some(1), &["MS1"]), (2, Some(1), &["MS2"])]);
        let ledger = RankLedger::build(players.values());
        let detector = ConflictDetector::new(&players, &ledger);

        let conflicts = detector
            .for_rank_bulk_assign(&[1, 2], &[], RankAssignMode::Set)
            .unwrap();
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_detection_is_repeatable_and_leaves_ledger_untouched() {
        let players = roster(&[(1, Some(1), &["MS1"]), (2, Some(1), &[])]);
        let ledger = RankLedger::build(players.values());
        let before = ledger.clone();
        let detector = ConflictDetector::new(&players, &ledger);

        let first = detector
            .for_rank_bulk_assign(&[2], &[rank("MS1")], RankAssignMode::Add)
            .unwrap();
        let second = detector
            .for_rank_bulk_assign(&[2], &[rank("MS1")], RankAssignMode::Add)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_unknown_player_is_rejected() {
        let players = roster(&[(1, Some(1), &[])]);
        let ledger = RankLedger::build(players.values());
        let detector = ConflictDetector::new(&players, &ledger);

        let err = detector.for_school_reassignment(&[1, 99], 1, CLEAR).unwrap_err();
        assert!(matches!(err, RosterError::PlayerNotFound(99)));
    }

    #[test]
    fn test_dedup_ids_keeps_first_seen_order() {
        assert_eq!(dedup_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
