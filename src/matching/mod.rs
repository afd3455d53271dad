//! Matching module: the pairing graph and match generation.
//!
//! Connections are drawn by hand between players of different schools and
//! tagged with the rank they are meant to play. They live only for the
//! session; [`MatchGenerator`] turns them into match proposals which the
//! caller can persist through the roster.

pub mod errors;
pub mod generator;
pub mod graph;
pub mod models;

pub use errors::{ConnectionError, ConnectionResult};
pub use generator::{Component, MatchGenerator};
pub use graph::ConnectionGraph;
pub use models::{Connection, ConnectionId, Endpoint, GeneratedMatch, GeneratedMatchId};
