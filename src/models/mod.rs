//! Roster domain models.
//!
//! Provides the core data types for representing on-call scheduling
//! requests and their solutions. All input entities are loaded once per
//! run and never mutated; a [`Schedule`] is the only value an engine
//! creates, and it is replaced wholesale on every run.
//!
//! # Relationships
//!
//! | Entity | Relation |
//! |--------|----------|
//! | Shift → Assignment | 1 : 1 (on success) |
//! | Assignment → Staff | N : 1 |
//! | Staff → TimeOffInterval | 1 : N |

mod schedule;
mod shift;
mod staff;
mod time_off;

pub use schedule::{Assignment, Schedule, SearchStats, SolveStatus, Violation, ViolationType};
pub use shift::{parse_flag, Shift, ShiftId};
pub use staff::{Staff, StaffId};
pub use time_off::{TimeOffInterval, TimeWindow};
