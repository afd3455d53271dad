//! Schedule module: the solver seam and staleness tracking.
//!
//! Every request carries the model epoch it was built from. A response is
//! applied only when its epoch still matches when it arrives; otherwise it
//! is discarded and the schedule stays stale.

pub mod errors;
pub mod models;
pub mod solver;
pub mod tracker;

pub use errors::{ScheduleError, ScheduleResult, SolverError};
pub use models::{
    Epoch, ScheduleRequest, ScheduleResponse, ScheduleSnapshot, SlotAssignment, StalenessState,
};
pub use solver::ScheduleSolver;
pub use tracker::ScheduleStalenessTracker;
#[cfg(any(test, feature = "test-support"))]
pub use solver::mock;
