//! Scheduling strategies and fairness reporting.
//!
//! Two interchangeable strategies sit behind [`SchedulingStrategy`]:
//!
//! - [`OptimizingScheduler`] builds a CP model and searches for the
//!   fairest roster that satisfies coverage, time-off, and minimum rest.
//! - [`RoundRobinScheduler`] cycles through staff and only honours
//!   time-off. It is fast and deterministic, suitable as a baseline.
//!
//! # Report
//!
//! [`ScheduleReport`] summarizes any schedule per staff member: shift
//! count, weighted workload, weekend/holiday counts, and deviation from
//! the FTE-proportional target.
//!
//! # References
//!
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review"

mod optimizing;
mod report;
mod round_robin;
mod strategy;

pub use optimizing::OptimizingScheduler;
pub use report::{ScheduleReport, StaffSummary};
pub use round_robin::RoundRobinScheduler;
pub use strategy::{RosterRequest, SchedulingStrategy};
