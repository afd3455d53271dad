//! Rank occupancy ledger.
//!
//! The ledger is a materialized view over `Player::ranks`; it is never a
//! source of truth. Build it from the current players, patch it while a
//! bulk operation walks its batch, and throw it away afterwards.

use super::{
    models::{Player, PlayerId, SchoolId},
    rank::RankCode,
};
use std::collections::BTreeMap;

/// A rank held by more than one player of the same school
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankDuplicate {
    pub school_id: SchoolId,
    pub rank: RankCode,
    pub holders: Vec<PlayerId>,
}

/// Index of `(school, rank) -> holding player`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankLedger {
    holders: BTreeMap<SchoolId, BTreeMap<RankCode, PlayerId>>,
}

impl RankLedger {
    /// Build the ledger from players in one pass.
    ///
    /// Players without a school are not indexed. If the input already holds
    /// duplicates the lowest player id wins; use [`RankLedger::duplicates`]
    /// to detect that case.
    pub fn build<'a>(players: impl IntoIterator<Item = &'a Player>) -> Self {
        let mut ledger = Self::default();
        for player in players {
            let Some(school_id) = player.school_id else {
                continue;
            };
            let school = ledger.holders.entry(school_id).or_default();
            for rank in &player.ranks {
                school
                    .entry(*rank)
                    .and_modify(|holder| *holder = (*holder).min(player.id))
                    .or_insert(player.id);
            }
        }
        log::debug!("Built rank ledger for {} schools", ledger.holders.len());
        ledger
    }

    /// Find every `(school, rank)` pair held by more than one player
    pub fn duplicates<'a>(players: impl IntoIterator<Item = &'a Player>) -> Vec<RankDuplicate> {
        let mut seen: BTreeMap<(SchoolId, RankCode), Vec<PlayerId>> = BTreeMap::new();
        for player in players {
            if let Some(school_id) = player.school_id {
                for rank in &player.ranks {
                    seen.entry((school_id, *rank)).or_default().push(player.id);
                }
            }
        }

        seen.into_iter()
            .filter(|(_, holders)| holders.len() > 1)
            .map(|((school_id, rank), mut holders)| {
                holders.sort_unstable();
                RankDuplicate {
                    school_id,
                    rank,
                    holders,
                }
            })
            .collect()
    }

    /// Player currently holding `rank` in `school_id`
    pub fn holder(&self, school_id: SchoolId, rank: RankCode) -> Option<PlayerId> {
        self.holders
            .get(&school_id)
            .and_then(|ranks| ranks.get(&rank))
            .copied()
    }

    /// Ranks held in a school, ordered by rank
    pub fn school_ranks(&self, school_id: SchoolId) -> impl Iterator<Item = (RankCode, PlayerId)> + '_ {
        self.holders
            .get(&school_id)
            .into_iter()
            .flat_map(|ranks| ranks.iter().map(|(rank, player)| (*rank, *player)))
    }

    /// Record `player_id` as holder of `rank` in `school_id`, returning the
    /// previous holder if there was one.
    pub fn claim(&mut self, school_id: SchoolId, rank: RankCode, player_id: PlayerId) -> Option<PlayerId> {
        self.holders
            .entry(school_id)
            .or_default()
            .insert(rank, player_id)
            .filter(|previous| *previous != player_id)
    }

    /// Release `rank` in `school_id` if `player_id` holds it
    pub fn release(&mut self, school_id: SchoolId, rank: RankCode, player_id: PlayerId) {
        if let Some(ranks) = self.holders.get_mut(&school_id) {
            if ranks.get(&rank) == Some(&player_id) {
                ranks.remove(&rank);
            }
            if ranks.is_empty() {
                self.holders.remove(&school_id);
            }
        }
    }

    /// Release every rank a player holds in their school
    pub fn release_player(&mut self, player: &Player) {
        if let Some(school_id) = player.school_id {
            for rank in &player.ranks {
                self.release(school_id, *rank, player.id);
            }
        }
    }

    /// Index every rank a player holds in their school
    pub fn claim_player(&mut self, player: &Player) {
        if let Some(school_id) = player.school_id {
            for rank in &player.ranks {
                self.claim(school_id, *rank, player.id);
            }
        }
    }

    /// Total number of indexed `(school, rank)` pairs
    pub fn len(&self) -> usize {
        self.holders.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }
}
