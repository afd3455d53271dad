//! Match generation from the pairing graph.
//!
//! Connections are grouped by rank; within a rank schools linked by any
//! chain of pairings form one component, and each component becomes one
//! candidate match. A component qualifies for a dual when it spans exactly
//! two schools and for a tri when it spans exactly three.
//! Other components are dropped from the output (they stay visible through
//! [`MatchGenerator::components`]).

use super::{
    graph::ConnectionGraph,
    models::{ConnectionId, Endpoint, GeneratedMatch, GeneratedMatchId},
};
use crate::roster::{MatchType, PlayerId, RankCode, SchoolId};
use std::collections::{BTreeMap, BTreeSet};

/// One connected component of a rank's pairing graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub rank: RankCode,
    /// Players grouped by school, schools ascending
    pub sides: BTreeMap<SchoolId, BTreeSet<PlayerId>>,
    pub connections: Vec<ConnectionId>,
}

impl Component {
    /// Schools spanned, ascending
    pub fn schools(&self) -> Vec<SchoolId> {
        self.sides.keys().copied().collect()
    }

    /// Whether the component spans exactly the schools `match_type` needs
    pub fn qualifies_for(&self, match_type: MatchType) -> bool {
        self.sides.len() == match_type.side_count()
    }

    fn lowest_player(&self) -> Option<PlayerId> {
        self.sides.values().flatten().min().copied()
    }
}

/// Partitions a [`ConnectionGraph`] into match proposals
pub struct MatchGenerator<'a> {
    graph: &'a ConnectionGraph,
}

impl<'a> MatchGenerator<'a> {
    pub fn new(graph: &'a ConnectionGraph) -> Self {
        Self { graph }
    }

    /// Every connected component, ordered by rank, then school set, then
    /// lowest player id
    pub fn components(&self) -> Vec<Component> {
        let mut by_rank: BTreeMap<RankCode, Vec<(ConnectionId, Endpoint, Endpoint)>> =
            BTreeMap::new();
        for c in self.graph.iter() {
            by_rank.entry(c.rank).or_default().push((c.id, c.from, c.to));
        }

        let mut components = Vec::new();
        for (rank, edges) in by_rank {
            components.extend(components_for_rank(rank, &edges));
        }

        components.sort_by(|a, b| {
            (a.rank, a.schools(), a.lowest_player()).cmp(&(b.rank, b.schools(), b.lowest_player()))
        });
        components
    }

    /// Generate match proposals of one type.
    ///
    /// Output is a pure function of the connection set: the same graph
    /// always yields the same ids, sides and ordering.
    pub fn generate(&self, match_type: MatchType) -> Vec<GeneratedMatch> {
        let components = self.components();
        // Components of one rank never share a school, so today every
        // counter stays at zero
        let mut disambiguators: BTreeMap<(RankCode, Vec<SchoolId>), usize> = BTreeMap::new();
        let mut matches = Vec::new();
        let mut dropped = 0usize;

        for component in components {
            if !component.qualifies_for(match_type) {
                dropped += 1;
                continue;
            }

            let schools = component.schools();
            let counter = disambiguators
                .entry((component.rank, schools.clone()))
                .or_insert(0);
            let id = GeneratedMatchId::new(component.rank, &schools, *counter);
            *counter += 1;

            let mut sides = component.sides.into_values();
            let (Some(side_a), Some(side_b)) = (sides.next(), sides.next()) else {
                continue;
            };
            let side_c = sides.next();

            matches.push(GeneratedMatch {
                id,
                rank: component.rank,
                match_type,
                schools,
                side_a,
                side_b,
                side_c,
            });
        }

        log::debug!(
            "Generated {} {} match(es), dropped {} component(s)",
            matches.len(),
            match_type,
            dropped
        );
        matches
    }
}

fn components_for_rank(rank: RankCode, edges: &[(ConnectionId, Endpoint, Endpoint)]) -> Vec<Component> {
    // Vertices are schools: every player a school fields in this rank joins
    // the same side, so two pairings between the same schools merge.
    let mut index: BTreeMap<SchoolId, usize> = BTreeMap::new();
    for (_, from, to) in edges {
        for school_id in [from.school_id, to.school_id] {
            let next = index.len();
            index.entry(school_id).or_insert(next);
        }
    }

    let mut sets = DisjointSet::new(index.len());
    for (_, from, to) in edges {
        sets.union(index[&from.school_id], index[&to.school_id]);
    }

    let mut grouped: BTreeMap<usize, Component> = BTreeMap::new();
    for (id, from, to) in edges {
        let root = sets.find(index[&from.school_id]);
        let component = grouped.entry(root).or_insert_with(|| Component {
            rank,
            sides: BTreeMap::new(),
            connections: Vec::new(),
        });
        for endpoint in [from, to] {
            component
                .sides
                .entry(endpoint.school_id)
                .or_default()
                .insert(endpoint.player_id);
        }
        component.connections.push(*id);
    }

    grouped.into_values().collect()
}

/// Union-find over vertex slots
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}
