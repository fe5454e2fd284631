//! Roster → CP model translation.

use tracing::{debug, warn};

use super::model::{CpModel, CpObjective, VarId};
use super::solver::{CpSolution, CpSolver, CpStatus, SolverConfig};
use crate::config::EngineConfig;
use crate::error::ScheduleError;
use crate::fairness::FairnessProfile;
use crate::feasibility::{rest_conflicts, Eligibility};
use crate::models::{Assignment, Schedule, Shift, SolveStatus, Staff, TimeOffInterval};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Builds a CP model from roster domain objects.
///
/// Rows are shifts in `(start, id)` order, columns are staff in input
/// order. Translates:
/// - time-off blocking → `Forbidden` cells
/// - minimum rest → `AtMostOne` per staff for every conflicting shift pair
/// - fairness → fixed-point load targets with absolute deviation
/// - back-to-back shifts → adjacency penalty between consecutive rows
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use u_roster::cp::{BranchAndBoundSolver, RosterCpBuilder};
/// use u_roster::models::{Shift, Staff};
/// use u_roster::EngineConfig;
///
/// let day = |d| NaiveDate::from_ymd_opt(2025, 10, d).unwrap().and_hms_opt(8, 0, 0).unwrap();
/// let staff = vec![Staff::new(1, "Ada"), Staff::new(2, "Grace")];
/// let shifts = vec![Shift::new(1, day(1), day(2)), Shift::new(2, day(3), day(4))];
///
/// let builder = RosterCpBuilder::new(&staff, &shifts);
/// let schedule = builder
///     .solve(&BranchAndBoundSolver::new(), &EngineConfig::default())
///     .unwrap();
/// assert_eq!(schedule.assignment_count(), 2);
/// ```
pub struct RosterCpBuilder<'a> {
    staff: &'a [Staff],
    shifts: Vec<Shift>,
    time_off: &'a [TimeOffInterval],
}

impl<'a> RosterCpBuilder<'a> {
    /// Creates a builder; shifts are copied and put into processing order.
    pub fn new(staff: &'a [Staff], shifts: &[Shift]) -> Self {
        let mut shifts = shifts.to_vec();
        shifts.sort_by_key(Shift::order_key);
        Self {
            staff,
            shifts,
            time_off: &[],
        }
    }

    /// Adds time-off intervals.
    pub fn with_time_off(mut self, time_off: &'a [TimeOffInterval]) -> Self {
        self.time_off = time_off;
        self
    }

    /// Shifts in row order.
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// Builds the CP model.
    pub fn build(&self, config: &EngineConfig) -> CpModel {
        let eligibility = Eligibility::compute(self.staff, &self.shifts, self.time_off);
        self.build_with(&eligibility, config)
    }

    fn build_with(&self, eligibility: &Eligibility, config: &EngineConfig) -> CpModel {
        let rows = self.shifts.len();
        let cols = self.staff.len();
        let mut model = CpModel::new("roster", rows, cols);

        for row in 0..rows {
            for col in 0..cols {
                if !eligibility.is_eligible(row, col) {
                    model.forbid(VarId::new(row, col));
                }
            }
        }

        for (a, b) in rest_conflicts(&self.shifts, config.min_rest_hours) {
            for col in 0..cols {
                // Already excluded by time-off.
                if !eligibility.is_eligible(a, col) || !eligibility.is_eligible(b, col) {
                    continue;
                }
                model.add_at_most_one(VarId::new(a, col), VarId::new(b, col));
            }
        }

        let weights = config.fairness_weights();
        let profile = FairnessProfile::compute(self.staff, &self.shifts, &weights);
        model.set_objective(CpObjective {
            row_weights: profile.fixed_weights(config.fixed_point_scale),
            col_targets: profile.fixed_targets(config.fixed_point_scale),
            deviation_weight: config.fairness_weight,
            adjacent_rows: (1..rows).map(|r| (r - 1, r)).collect(),
            adjacency_weight: config.consecutive_weight,
        });

        debug!(
            vars = model.var_count(),
            constraints = model.constraint_count(),
            "roster model built"
        );
        model
    }

    /// Builds and solves the model, returning a schedule or a typed failure.
    pub fn solve<S: CpSolver + ?Sized>(
        &self,
        solver: &S,
        config: &EngineConfig,
    ) -> Result<Schedule, ScheduleError> {
        let eligibility = Eligibility::compute(self.staff, &self.shifts, self.time_off);
        if let Some(row) = eligibility.first_uncoverable() {
            let reason = if self.staff.is_empty() {
                "no staff to assign"
            } else {
                "every staff member is on time off"
            };
            return Err(ScheduleError::infeasible_shift(&self.shifts[row], reason));
        }

        let model = self.build_with(&eligibility, config);
        if model.objective_bound().is_none() {
            return Err(objective_overflow());
        }
        let solver_config = SolverConfig::with_time_limit(config.time_limit());
        let solution = solver.solve(&model, &solver_config);

        match solution.status {
            CpStatus::Optimal | CpStatus::Feasible => {
                if !model.is_feasible(&solution.values) {
                    // Never hand out a partial or double-booked roster.
                    return Err(ScheduleError::Infeasible {
                        shift: None,
                        reason: format!(
                            "solver '{}' returned an assignment violating hard constraints",
                            solver.name()
                        ),
                    });
                }
                Ok(self.decode_solution(&solution))
            }
            CpStatus::Infeasible => {
                let reason = "minimum rest and time-off constraints leave no valid assignment";
                warn!(solver = solver.name(), "roster model is infeasible");
                Err(match solution.critical_row {
                    Some(row) => ScheduleError::infeasible_shift(&self.shifts[row], reason),
                    None => ScheduleError::Infeasible {
                        shift: None,
                        reason: reason.to_string(),
                    },
                })
            }
            CpStatus::Timeout => {
                warn!(
                    solver = solver.name(),
                    limit_ms = solver_config.time_limit.as_millis() as u64,
                    "time limit reached without a feasible roster"
                );
                Err(ScheduleError::SolverTimeout {
                    limit: solver_config.time_limit,
                })
            }
            CpStatus::InvalidModel => Err(objective_overflow()),
        }
    }

    /// Decodes a CP solution into a Schedule.
    fn decode_solution(&self, solution: &CpSolution) -> Schedule {
        let status = if solution.status == CpStatus::Optimal {
            SolveStatus::Optimal
        } else {
            SolveStatus::Feasible
        };
        let mut schedule = Schedule::new(status).with_stats(solution.stats.clone());
        if let Some(objective) = solution.objective {
            schedule = schedule.with_objective(objective);
        }

        for (shift, &col) in self.shifts.iter().zip(&solution.values) {
            schedule.add_assignment(Assignment::new(
                shift.id,
                self.staff[col].id,
                shift.start,
                shift.end,
            ));
        }
        schedule.sort_chronologically();
        schedule
    }
}

fn objective_overflow() -> ScheduleError {
    ScheduleError::InvalidInput(vec![ValidationError::new(
        ValidationErrorKind::InvalidConfig,
        "fixed-point objective exceeds i64 range; lower the weights or fixed_point_scale",
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::BranchAndBoundSolver;
    use crate::cp::CpConstraint;
    use crate::models::{ShiftId, StaffId};
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn daily_shifts(n: i64) -> Vec<Shift> {
        (0..n)
            .map(|i| {
                let start = at(1, 8) + TimeDelta::days(i);
                Shift::new(i + 1, start, start + TimeDelta::hours(12))
            })
            .collect()
    }

    fn staff(n: i64) -> Vec<Staff> {
        (1..=n).map(|i| Staff::new(i, format!("S{i}"))).collect()
    }

    #[test]
    fn test_build_model_shape() {
        let staff = staff(3);
        let shifts = daily_shifts(4);
        let config = EngineConfig::default();
        let model = RosterCpBuilder::new(&staff, &shifts).build(&config);

        assert_eq!(model.rows, 4);
        assert_eq!(model.cols, 3);
        assert_eq!(model.var_count(), 12);
        // Daily 12h shifts leave 12h rest: each consecutive pair conflicts
        // for each staff member at the 24h default.
        assert_eq!(model.constraint_count(), 3 * 3);
        assert_eq!(model.objective.row_weights, vec![100; 4]);
        assert_eq!(model.objective.col_targets, vec![133; 3]);
        assert_eq!(model.objective.adjacent_rows, vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(model.objective.deviation_weight, 10);
        assert_eq!(model.objective.adjacency_weight, 1);
    }

    #[test]
    fn test_build_sorts_rows() {
        let staff = staff(1);
        let mut shifts = daily_shifts(3);
        shifts.reverse();
        let builder = RosterCpBuilder::new(&staff, &shifts);
        let ids: Vec<ShiftId> = builder.shifts().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![ShiftId(1), ShiftId(2), ShiftId(3)]);
    }

    #[test]
    fn test_time_off_becomes_forbidden() {
        let staff = staff(2);
        let shifts = daily_shifts(2);
        let time_off = vec![TimeOffInterval::new(2, at(1, 0), at(2, 0))];
        let config = EngineConfig::default().with_min_rest_hours(0.0);
        let model = RosterCpBuilder::new(&staff, &shifts)
            .with_time_off(&time_off)
            .build(&config);
        assert_eq!(
            model.constraints,
            vec![CpConstraint::Forbidden(VarId::new(0, 1))]
        );
    }

    #[test]
    fn test_solve_respects_rest() {
        let staff = staff(2);
        let shifts = daily_shifts(4);
        let config = EngineConfig::default();
        let schedule = RosterCpBuilder::new(&staff, &shifts)
            .solve(&BranchAndBoundSolver::new(), &config)
            .unwrap();
        assert_eq!(schedule.status, SolveStatus::Optimal);
        let ids: Vec<StaffId> = schedule.assignments.iter().map(|a| a.staff_id).collect();
        // 12h gaps force strict alternation.
        for pair in ids.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_solve_rest_infeasible() {
        // One person, two shifts 12h apart, 24h rest required.
        let staff = staff(1);
        let shifts = daily_shifts(2);
        let err = RosterCpBuilder::new(&staff, &shifts)
            .solve(&BranchAndBoundSolver::new(), &EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Infeasible { .. }));
        assert!(err.blocking_shift().is_some());
    }

    #[test]
    fn test_solve_rejects_overflowing_objective() {
        // Each weight fits on its own; the sum over all rows does not.
        let staff = staff(2);
        let shifts = daily_shifts(300);
        let config = EngineConfig::default()
            .with_min_rest_hours(0.0)
            .with_fixed_point_scale(1 << 51);
        assert!(config.validate().is_ok());
        assert!(RosterCpBuilder::new(&staff, &shifts)
            .build(&config)
            .objective_bound()
            .is_none());

        let err = RosterCpBuilder::new(&staff, &shifts)
            .solve(&BranchAndBoundSolver::new(), &config)
            .unwrap_err();
        let ScheduleError::InvalidInput(errors) = err else {
            panic!("expected InvalidInput");
        };
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidConfig);
    }

    #[test]
    fn test_solve_no_staff() {
        let shifts = daily_shifts(1);
        let err = RosterCpBuilder::new(&[], &shifts)
            .solve(&BranchAndBoundSolver::new(), &EngineConfig::default())
            .unwrap_err();
        assert_eq!(err.blocking_shift(), Some(ShiftId(1)));
        assert!(err.to_string().contains("no staff"));
    }
}
