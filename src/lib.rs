//! # Tourney Core
//!
//! Roster consistency and match generation for school-based racket
//! tournaments.
//!
//! Players belong to schools and hold competition ranks (`MS1`, `WD2`, ...).
//! Within a school each rank has at most one holder. This crate keeps that
//! invariant under single and bulk edits, reports collisions instead of
//! failing on them, and turns hand-drawn pairings into dual or tri matches.
//!
//! ## Core Modules
//!
//! - [`roster`]: Schools, players, ranks, matches and the mutations over them
//! - [`matching`]: Pairing graph and deterministic match generation
//! - [`schedule`]: Solver seam and schedule staleness tracking
//! - [`session`]: The single writer tying the three together
//! - [`config`]: Tournament configuration
//!
//! ## Example
//!
//! ```
//! use tourney_core::{
//!     TournamentSession,
//!     roster::{AddPlayer, AddSchool, MatchType, NewPlayer},
//! };
//!
//! let mut session = TournamentSession::default();
//! for name in ["Alder", "Birch"] {
//!     session.execute(AddSchool { name: name.to_string() }).unwrap();
//! }
//! for (name, school) in [("Hana", 1), ("Iris", 2)] {
//!     let player = NewPlayer::named(name)
//!         .in_school(school)
//!         .with_ranks(["WS1".parse().unwrap()]);
//!     session.execute(AddPlayer { player }).unwrap();
//! }
//!
//! session.connect(1, 2, "WS1".parse().unwrap()).unwrap();
//! let proposals = session.generate_matches(MatchType::Dual);
//! assert_eq!(proposals[0].id.as_str(), "WS1:1v2#0");
//! ```

/// Tournament configuration.
pub mod config;
pub use config::TournamentConfig;

/// Roster model, rank ledger, conflict detection and bulk mutations.
pub mod roster;
pub use roster::{RosterError, RosterResult, RosterState};

/// Pairing graph and match generation.
pub mod matching;
pub use matching::{ConnectionGraph, MatchGenerator};

/// Schedule solver seam and staleness tracking.
pub mod schedule;
pub use schedule::{ScheduleSolver, ScheduleStalenessTracker};

/// Interactive session facade.
pub mod session;
pub use session::TournamentSession;
