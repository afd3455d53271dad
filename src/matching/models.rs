//! Connection and generated match models.

use crate::roster::{MatchDraft, MatchType, PlayerId, RankCode, SchoolId};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

/// Connection ID type, unique within one graph
pub type ConnectionId = u64;

/// One end of a pairing edge: a player and the school they played for
/// when the edge was drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Endpoint {
    pub player_id: PlayerId,
    pub school_id: SchoolId,
}

impl Endpoint {
    pub fn new(player_id: PlayerId, school_id: SchoolId) -> Self {
        Self {
            player_id,
            school_id,
        }
    }
}

/// Manually drawn pairing between two players of different schools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: Endpoint,
    pub to: Endpoint,
    pub rank: RankCode,
}

impl Connection {
    /// Whether both connections join the same two players for the same rank,
    /// regardless of direction
    pub fn same_edge(&self, from: &Endpoint, to: &Endpoint, rank: RankCode) -> bool {
        let (a, b) = ordered_pair(self.from.player_id, self.to.player_id);
        self.rank == rank && (a, b) == ordered_pair(from.player_id, to.player_id)
    }

    pub fn touches(&self, player_id: PlayerId) -> bool {
        self.from.player_id == player_id || self.to.player_id == player_id
    }
}

fn ordered_pair(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Deterministic id of a generated match: rank, sorted school ids and a
/// disambiguator, e.g. `WS1:1v2#0`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeneratedMatchId(String);

impl GeneratedMatchId {
    pub(crate) fn new(rank: RankCode, schools: &[SchoolId], disambiguator: usize) -> Self {
        let schools: Vec<String> = schools.iter().map(ToString::to_string).collect();
        Self(format!("{rank}:{}#{disambiguator}", schools.join("v")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratedMatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Match proposal derived from one connected component of the pairing graph.
///
/// Sides are ordered by ascending school id; `schools[i]` owns side `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMatch {
    pub id: GeneratedMatchId,
    pub rank: RankCode,
    pub match_type: MatchType,
    pub schools: Vec<SchoolId>,
    pub side_a: BTreeSet<PlayerId>,
    pub side_b: BTreeSet<PlayerId>,
    pub side_c: Option<BTreeSet<PlayerId>>,
}

impl GeneratedMatch {
    /// Sides in order, sideA first
    pub fn sides(&self) -> Vec<&BTreeSet<PlayerId>> {
        let mut sides = vec![&self.side_a, &self.side_b];
        sides.extend(self.side_c.as_ref());
        sides
    }

    /// Turn the proposal into input for a persisted match
    pub fn to_draft(&self) -> MatchDraft {
        MatchDraft {
            rank: self.rank,
            match_type: self.match_type,
            sides: self.sides().into_iter().cloned().collect(),
        }
    }
}
