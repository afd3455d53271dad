//! Roster module: schools, players, ranks and the invariants between them.
//!
//! This module provides:
//! - Structured rank codes parsed once at the ingestion boundary
//! - A derived rank ledger (`(school, rank) -> player`)
//! - Conflict detection for previews of school and rank changes
//! - Atomic bulk school/rank operations with per-player reports
//! - Commands applied as pure `(state, command) -> state` transitions
//! - JSON export and validated import
//!
//! ## Example
//!
//! ```
//! use tourney_core::roster::{AddPlayer, AddSchool, NewPlayer, RosterState};
//!
//! let roster = RosterState::default();
//! let (roster, _) = roster.apply(AddSchool { name: "Alder".to_string() }).unwrap();
//! let (roster, _) = roster
//!     .apply(AddPlayer {
//!         player: NewPlayer::named("Hana")
//!             .in_school(1)
//!             .with_ranks(["MS1".parse().unwrap()]),
//!     })
//!     .unwrap();
//!
//! let ledger = roster.ledger();
//! assert_eq!(ledger.holder(1, "MS1".parse().unwrap()), Some(1));
//! ```

pub mod bulk;
pub mod commands;
pub mod conflicts;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod models;
pub mod rank;
pub mod state;

pub use bulk::{
    BulkMutationEngine, BulkReport, DeleteReport, PlayerOutcome, RankTransfer,
    SchoolConflictResolution,
};
pub use commands::{
    AddMatches, AddPlayer, AddSchool, AssignRanks, AssignSchool, DeleteMatch, DeletePlayers,
    DeleteSchool, ImportRoster, MutationOutcome, RenameSchool, RosterCommand, RosterMutation,
    UpdateConfig, UpdatePlayer,
};
pub use conflicts::{ConflictDetector, RankAssignMode, RankConflict};
pub use errors::{RosterError, RosterResult};
pub use export::RosterExport;
pub use ledger::{RankDuplicate, RankLedger};
pub use models::{
    AvailabilityWindow, Match, MatchDraft, MatchId, MatchType, NewPlayer, Player, PlayerId,
    PlayerUpdate, School, SchoolId,
};
pub use rank::{RankCategory, RankCode, RankParseError};
pub use state::RosterState;
