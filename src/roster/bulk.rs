//! Bulk school and rank mutations.
//!
//! Every operation validates the whole batch before touching anything:
//! unknown ids and invariant violations reject the call with no mutation.
//! Rank collisions are not failures; they are resolved or reported per
//! player in the returned [`BulkReport`].

use super::{
    conflicts::{ConflictDetector, RankAssignMode, RankConflict, dedup_ids},
    errors::{RosterError, RosterResult},
    models::{MatchId, PlayerId, SchoolId},
    rank::RankCode,
    state::RosterState,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What to do with ranks that collide in the destination school
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolConflictResolution {
    /// Strip the colliding ranks from the mover, then move it
    ClearConflicting,
    /// Move only players without collisions; colliding players stay in
    /// their current school and are reported
    ProceedAsIs,
}

/// A rank taken away from its previous holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTransfer {
    pub rank: RankCode,
    pub from_player: PlayerId,
}

/// Per-player result of a roster mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerOutcome {
    pub player_id: PlayerId,
    /// Whether the player's school or ranks changed
    pub changed: bool,
    /// Ranks removed from this player to avoid a collision
    pub cleared: Vec<RankCode>,
    /// Ranks this player took over from other players
    pub transferred: Vec<RankTransfer>,
    /// Ranks that were skipped because another player holds them
    pub conflicts: Vec<RankCode>,
}

impl PlayerOutcome {
    pub(crate) fn unchanged(player_id: PlayerId) -> Self {
        Self {
            player_id,
            changed: false,
            cleared: Vec::new(),
            transferred: Vec::new(),
            conflicts: Vec::new(),
        }
    }
}

/// Result of a bulk school or rank operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    pub outcomes: Vec<PlayerOutcome>,
    /// Unresolved collisions, one entry per affected player
    pub conflicts: Vec<RankConflict>,
}

impl BulkReport {
    /// Whether any player changed
    pub fn changed(&self) -> bool {
        self.outcomes.iter().any(|o| o.changed)
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Outcome for one player
    pub fn outcome(&self, player_id: PlayerId) -> Option<&PlayerOutcome> {
        self.outcomes.iter().find(|o| o.player_id == player_id)
    }
}

/// Result of deleting players
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReport {
    pub deleted: Vec<PlayerId>,
    /// Requested ids that did not exist
    pub missing: Vec<PlayerId>,
    /// Persisted matches that lost a whole side and were removed
    pub matches_removed: Vec<MatchId>,
}

/// Applies multi-player school and rank operations atomically
pub struct BulkMutationEngine<'a> {
    roster: &'a mut RosterState,
}

impl<'a> BulkMutationEngine<'a> {
    pub fn new(roster: &'a mut RosterState) -> Self {
        Self { roster }
    }

    /// Move players into `target_school_id`.
    ///
    /// With [`SchoolConflictResolution::ClearConflicting`] each mover loses
    /// exactly the ranks already held by another player of the target
    /// school. With [`SchoolConflictResolution::ProceedAsIs`] a mover with any
    /// collision is not moved at all; the rank-uniqueness invariant is never
    /// relaxed.
    pub fn assign_school(
        &mut self,
        player_ids: &[PlayerId],
        target_school_id: SchoolId,
        resolution: SchoolConflictResolution,
    ) -> RosterResult<BulkReport> {
        if !self.roster.schools.contains_key(&target_school_id) {
            return Err(RosterError::SchoolNotFound(target_school_id));
        }
        let ids = self.validated_ids(player_ids)?;

        let mut ledger = self.roster.ledger();
        let mut report = BulkReport::default();

        for id in ids {
            let Some(player) = self.roster.players.get_mut(&id) else {
                continue;
            };

            if player.school_id == Some(target_school_id) {
                report.outcomes.push(PlayerOutcome::unchanged(id));
                continue;
            }

            let colliding =
                ConflictDetector::colliding_ranks(&ledger, id, target_school_id, &player.ranks);

            if !colliding.is_empty() && resolution == SchoolConflictResolution::ProceedAsIs {
                report.conflicts.push(RankConflict {
                    player_id: id,
                    player_name: player.name.clone(),
                    conflicting_ranks: colliding.clone(),
                });
                report.outcomes.push(PlayerOutcome {
                    conflicts: colliding,
                    ..PlayerOutcome::unchanged(id)
                });
                continue;
            }

            ledger.release_player(player);
            for rank in &colliding {
                player.ranks.remove(rank);
            }
            player.school_id = Some(target_school_id);
            ledger.claim_player(player);

            report.outcomes.push(PlayerOutcome {
                player_id: id,
                changed: true,
                cleared: colliding,
                transferred: Vec::new(),
                conflicts: Vec::new(),
            });
        }

        log::info!(
            "Assigned {} player(s) to school {} ({} skipped)",
            report.outcomes.iter().filter(|o| o.changed).count(),
            target_school_id,
            report.conflicts.len()
        );

        Ok(report)
    }

    /// Assign `ranks` to each player according to `mode`.
    ///
    /// A rank already held by another player of the same school is either
    /// taken away from that holder (`auto_resolve_conflicts`) or skipped for
    /// the current player and reported. Players are processed in batch
    /// order, so within one batch a later player can take a rank an earlier
    /// one just received.
    pub fn bulk_assign_ranks(
        &mut self,
        player_ids: &[PlayerId],
        ranks: &[RankCode],
        mode: RankAssignMode,
        auto_resolve_conflicts: bool,
    ) -> RosterResult<BulkReport> {
        let ids = self.validated_ids(player_ids)?;
        let candidates: BTreeSet<RankCode> = ranks.iter().copied().collect();

        let mut ledger = self.roster.ledger();
        let mut report = BulkReport::default();

        for id in ids {
            let Some((name, school_id, current)) = self
                .roster
                .players
                .get(&id)
                .map(|p| (p.name.clone(), p.school_id, p.ranks.clone()))
            else {
                continue;
            };

            let mut outcome = PlayerOutcome::unchanged(id);

            let next: BTreeSet<RankCode> = match mode {
                RankAssignMode::Remove => current.difference(&candidates).copied().collect(),
                RankAssignMode::Add | RankAssignMode::Set => {
                    let mut granted = candidates.clone();

                    if let Some(school_id) = school_id {
                        let colliding =
                            ConflictDetector::colliding_ranks(&ledger, id, school_id, &candidates);

                        for rank in colliding {
                            if auto_resolve_conflicts {
                                if let Some(holder) = ledger.holder(school_id, rank) {
                                    if let Some(prior) = self.roster.players.get_mut(&holder) {
                                        prior.ranks.remove(&rank);
                                    }
                                    ledger.release(school_id, rank, holder);
                                    outcome.transferred.push(RankTransfer {
                                        rank,
                                        from_player: holder,
                                    });
                                }
                            } else {
                                granted.remove(&rank);
                                outcome.conflicts.push(rank);
                            }
                        }
                    }

                    if mode == RankAssignMode::Add {
                        current.union(&granted).copied().collect()
                    } else {
                        granted
                    }
                }
            };

            if let Some(school_id) = school_id {
                for rank in current.difference(&next) {
                    ledger.release(school_id, *rank, id);
                }
                for rank in &next {
                    ledger.claim(school_id, *rank, id);
                }
            }

            outcome.changed = next != current || !outcome.transferred.is_empty();
            if !outcome.conflicts.is_empty() {
                report.conflicts.push(RankConflict {
                    player_id: id,
                    player_name: name,
                    conflicting_ranks: outcome.conflicts.clone(),
                });
            }

            if let Some(player) = self.roster.players.get_mut(&id) {
                player.ranks = next;
            }
            report.outcomes.push(outcome);
        }

        log::info!(
            "Bulk {:?} of {} rank(s) over {} player(s): {} changed, {} conflict(s)",
            mode,
            candidates.len(),
            report.outcomes.len(),
            report.outcomes.iter().filter(|o| o.changed).count(),
            report.conflicts.len()
        );

        Ok(report)
    }

    /// Delete players unconditionally.
    ///
    /// Unknown ids are reported as missing. Deleted players are removed
    /// from persisted matches; a match left with an empty side is removed.
    pub fn delete_players(&mut self, player_ids: &[PlayerId]) -> DeleteReport {
        let mut report = DeleteReport::default();

        for id in dedup_ids(player_ids) {
            if self.roster.players.remove(&id).is_some() {
                report.deleted.push(id);
            } else {
                report.missing.push(id);
            }
        }

        if !report.deleted.is_empty() {
            let deleted: BTreeSet<PlayerId> = report.deleted.iter().copied().collect();
            for m in self.roster.matches.values_mut() {
                for side in &mut m.sides {
                    side.retain(|p| !deleted.contains(p));
                }
            }
            report.matches_removed = self
                .roster
                .matches
                .values()
                .filter(|m| m.sides.iter().any(BTreeSet::is_empty))
                .map(|m| m.id)
                .collect();
            for match_id in &report.matches_removed {
                self.roster.matches.remove(match_id);
            }

            log::info!(
                "Deleted {} player(s), removed {} match(es)",
                report.deleted.len(),
                report.matches_removed.len()
            );
        }

        report
    }

    /// Delete a school that no player references.
    pub fn delete_school(&mut self, school_id: SchoolId) -> RosterResult<()> {
        if !self.roster.schools.contains_key(&school_id) {
            return Err(RosterError::SchoolNotFound(school_id));
        }

        let dependents = self.roster.players_in_school(school_id).count();
        if dependents > 0 {
            return Err(RosterError::InvariantViolation(format!(
                "school {school_id} still has {dependents} player(s)"
            )));
        }

        self.roster.schools.remove(&school_id);
        log::info!("Deleted school {}", school_id);
        Ok(())
    }

    fn validated_ids(&self, player_ids: &[PlayerId]) -> RosterResult<Vec<PlayerId>> {
        let ids = dedup_ids(player_ids);
        if let Some(missing) = ids.iter().find(|id| !self.roster.players.contains_key(id)) {
            return Err(RosterError::PlayerNotFound(*missing));
        }
        Ok(ids)
    }
}
