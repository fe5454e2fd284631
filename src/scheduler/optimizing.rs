//! Optimizing strategy backed by a CP solver.
//!
//! Enforces coverage, time-off, and minimum rest as hard constraints and
//! minimizes FTE-weighted unfairness plus back-to-back duty. See
//! [`crate::cp`] for the model.

use tracing::{info, instrument, warn};

use super::strategy::{RosterRequest, SchedulingStrategy};
use crate::config::EngineConfig;
use crate::cp::{BranchAndBoundSolver, CpSolver, RosterCpBuilder};
use crate::error::ScheduleError;
use crate::models::{Schedule, SolveStatus};

/// Optimal (or best-within-budget) roster via a [`CpSolver`].
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, TimeDelta};
/// use u_roster::models::{Shift, Staff};
/// use u_roster::scheduler::{OptimizingScheduler, RosterRequest, SchedulingStrategy};
/// use u_roster::EngineConfig;
///
/// let monday = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap().and_hms_opt(7, 0, 0).unwrap();
/// let shifts: Vec<Shift> = (0..4)
///     .map(|i| {
///         let start = monday + TimeDelta::hours(48 * i);
///         Shift::new(i + 1, start, start + TimeDelta::hours(24))
///     })
///     .collect();
/// let request = RosterRequest::new(vec![Staff::new(1, "Ada"), Staff::new(2, "Grace")], shifts);
///
/// let schedule = OptimizingScheduler::new()
///     .schedule(&request, &EngineConfig::default())
///     .unwrap();
/// assert_eq!(schedule.assignment_count(), 4);
/// assert!(schedule.is_optimal());
/// ```
#[derive(Debug, Clone)]
pub struct OptimizingScheduler<S = BranchAndBoundSolver> {
    solver: S,
}

impl OptimizingScheduler {
    /// Creates a scheduler using the bundled branch-and-bound solver.
    pub fn new() -> Self {
        Self {
            solver: BranchAndBoundSolver::new(),
        }
    }
}

impl Default for OptimizingScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CpSolver> OptimizingScheduler<S> {
    /// Creates a scheduler using a custom solver backend.
    pub fn with_solver(solver: S) -> Self {
        Self { solver }
    }

    /// The solver backend.
    pub fn solver(&self) -> &S {
        &self.solver
    }
}

impl<S: CpSolver> SchedulingStrategy for OptimizingScheduler<S> {
    fn name(&self) -> &'static str {
        "optimizing"
    }

    #[instrument(
        skip_all,
        fields(
            strategy = self.name(),
            solver = self.solver.name(),
            shifts = request.shifts.len(),
            staff = request.staff.len(),
        )
    )]
    fn schedule(
        &self,
        request: &RosterRequest,
        config: &EngineConfig,
    ) -> Result<Schedule, ScheduleError> {
        request.validate(config)?;
        info!("optimizing roster");

        let builder = RosterCpBuilder::new(&request.staff, &request.shifts)
            .with_time_off(&request.time_off);
        let result = builder.solve(&self.solver, config);

        match &result {
            Ok(schedule) => {
                if schedule.status == SolveStatus::Feasible {
                    warn!(
                        objective = schedule.objective,
                        "time limit reached; returning best roster found"
                    );
                }
                info!(
                    status = ?schedule.status,
                    objective = schedule.objective,
                    assignments = schedule.assignment_count(),
                    "roster ready"
                );
            }
            Err(err) => warn!(error = %err, "optimization failed"),
        }
        result
    }
}
