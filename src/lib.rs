//! On-call roster engine.
//!
//! Assigns staff to on-call shifts so that every shift is covered exactly
//! once, nobody works while on approved leave, staff get a minimum rest
//! window between duties, and weighted workload (weekends and holidays
//! count more) is spread in proportion to each person's FTE.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Staff`, `Shift`, `TimeOffInterval`,
//!   `Schedule`, `Assignment`, `Violation`
//! - **`config`**: `EngineConfig` (weights, rest window, time budget)
//! - **`validation`**: Input integrity checks (duplicate IDs, bad ranges, unknown staff)
//! - **`feasibility`**: Time-off and minimum-rest predicates, schedule audit
//! - **`fairness`**: Shift weights and FTE-proportional targets
//! - **`cp`**: Boolean assignment model and the branch-and-bound solver
//! - **`scheduler`**: Optimizing and round-robin strategies, fairness report
//! - **`error`**: `ScheduleError`
//!
//! # Example
//!
//! ```
//! use chrono::{NaiveDate, TimeDelta};
//! use u_roster::models::{Shift, Staff};
//! use u_roster::scheduler::{OptimizingScheduler, ScheduleReport, SchedulingStrategy};
//! use u_roster::{EngineConfig, RosterRequest};
//!
//! let monday = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap().and_hms_opt(7, 0, 0).unwrap();
//! let shifts: Vec<Shift> = (0..7)
//!     .map(|d| {
//!         let start = monday + TimeDelta::days(d);
//!         Shift::new(d + 1, start, start + TimeDelta::hours(12)).with_weekend(d >= 5)
//!     })
//!     .collect();
//! let staff = vec![Staff::new(1, "Ada"), Staff::new(2, "Grace"), Staff::new(3, "Linus")];
//! let request = RosterRequest::new(staff, shifts);
//! let config = EngineConfig::default();
//!
//! let schedule = OptimizingScheduler::new().schedule(&request, &config).unwrap();
//! assert_eq!(schedule.assignment_count(), 7);
//!
//! let report = ScheduleReport::calculate(&schedule, &request, &config.fairness_weights());
//! assert_eq!(report.staff.len(), 3);
//! ```
//!
//! # References
//!
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Baptiste et al. (2001), "Constraint-Based Scheduling"

pub mod config;
pub mod cp;
pub mod error;
pub mod fairness;
pub mod feasibility;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::{EngineConfig, FairnessWeights};
pub use error::{ScheduleError, ShiftWindow};
pub use scheduler::{
    OptimizingScheduler, RoundRobinScheduler, RosterRequest, ScheduleReport, SchedulingStrategy,
};
