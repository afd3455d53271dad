//! Session-scoped graph of manually drawn player pairings.

use super::{
    errors::{ConnectionError, ConnectionResult},
    models::{Connection, ConnectionId, Endpoint},
};
use crate::roster::{PlayerId, RankCode, RosterState};
use std::collections::BTreeMap;

/// Pairing edges tagged by rank. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    connections: BTreeMap<ConnectionId, Connection>,
    next_id: ConnectionId,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pairing edge.
    ///
    /// Rejects endpoints from the same school (which includes self-loops)
    /// and an undirected duplicate of an existing edge for the same rank.
    pub fn add_connection(
        &mut self,
        from: Endpoint,
        to: Endpoint,
        rank: RankCode,
    ) -> ConnectionResult<ConnectionId> {
        if from.school_id == to.school_id {
            return Err(ConnectionError::SameSchool(from.school_id));
        }

        if let Some(existing) = self
            .connections
            .values()
            .find(|c| c.same_edge(&from, &to, rank))
        {
            return Err(ConnectionError::Duplicate(existing.id));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.connections.insert(id, Connection { id, from, to, rank });
        Ok(id)
    }

    pub fn remove_connection(&mut self, id: ConnectionId) -> ConnectionResult<Connection> {
        self.connections
            .remove(&id)
            .ok_or(ConnectionError::NotFound(id))
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    /// All connections in id order
    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connections_for_rank(&self, rank: RankCode) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.rank == rank)
    }

    pub fn connections_for_player(&self, player_id: PlayerId) -> impl Iterator<Item = &Connection> {
        self.connections
            .values()
            .filter(move |c| c.touches(player_id))
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn clear(&mut self) {
        self.connections.clear();
    }

    /// Drop edges whose players were deleted or changed school since the
    /// edge was drawn. Returns the removed ids.
    pub fn retain_valid(&mut self, roster: &RosterState) -> Vec<ConnectionId> {
        let still_valid = |endpoint: &Endpoint| {
            roster
                .player(endpoint.player_id)
                .is_some_and(|p| p.school_id == Some(endpoint.school_id))
        };

        let stale: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| !still_valid(&c.from) || !still_valid(&c.to))
            .map(|c| c.id)
            .collect();

        for id in &stale {
            self.connections.remove(id);
        }
        if !stale.is_empty() {
            log::warn!("Dropped {} connection(s) after roster change", stale.len());
        }
        stale
    }
}
