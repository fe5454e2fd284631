//! Schedule (solution) model.
//!
//! A schedule is the complete set of shift → staff assignments produced by
//! one run of a scheduling strategy. Successful schedules always cover
//! every shift exactly once; [`Violation`]s are only produced by auditing
//! a schedule against its input.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ShiftId, StaffId};

/// A complete roster (solution to a scheduling request).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Assignments ordered by `(start, shift_id)`.
    pub assignments: Vec<Assignment>,
    /// How the schedule was obtained.
    pub status: SolveStatus,
    /// Objective value (fixed-point), when produced by an optimizer.
    pub objective: Option<i64>,
    /// Search statistics, when produced by an optimizer.
    pub stats: Option<SearchStats>,
}

/// A shift-staff assignment.
///
/// The shift window is denormalized for ordering and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Covered shift.
    pub shift_id: ShiftId,
    /// Staff member on call.
    pub staff_id: StaffId,
    /// Shift start.
    pub start: NaiveDateTime,
    /// Shift end.
    pub end: NaiveDateTime,
}

/// Quality of a produced schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Optimizer proved optimality.
    Optimal,
    /// Optimizer found a solution but ran out of time before proving it optimal.
    Feasible,
    /// Produced by a heuristic; rest and fairness are not guaranteed.
    Heuristic,
}

/// Counters reported by a search-based solver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Search nodes visited.
    pub nodes: u64,
    /// Dead ends (domain wipe-outs and bound prunes).
    pub backtracks: u64,
    /// Improving solutions found.
    pub solutions: u64,
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
}

/// A rule broken by a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Shift involved, if any.
    pub shift_id: Option<ShiftId>,
    /// Staff member involved, if any.
    pub staff_id: Option<StaffId>,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A shift has no assignment.
    Uncovered,
    /// A shift has more than one assignment.
    DoubleCovered,
    /// An assignment references a shift not in the request.
    UnknownShift,
    /// An assignment references a staff member not in the request.
    UnknownStaff,
    /// Staff assigned during their time-off.
    TimeOffConflict,
    /// Staff holds two shifts closer than the minimum rest window.
    RestViolation,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(
        shift_id: impl Into<ShiftId>,
        staff_id: impl Into<StaffId>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            shift_id: shift_id.into(),
            staff_id: staff_id.into(),
            start,
            end,
        }
    }
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        shift_id: Option<ShiftId>,
        staff_id: Option<StaffId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            shift_id,
            staff_id,
            message: message.into(),
        }
    }

    /// Creates an uncovered-shift violation.
    pub fn uncovered(shift_id: ShiftId) -> Self {
        Self::new(
            ViolationType::Uncovered,
            Some(shift_id),
            None,
            format!("Shift {shift_id} has no assignment"),
        )
    }

    /// Creates a double-coverage violation.
    pub fn double_covered(shift_id: ShiftId, count: usize) -> Self {
        Self::new(
            ViolationType::DoubleCovered,
            Some(shift_id),
            None,
            format!("Shift {shift_id} is assigned {count} times"),
        )
    }

    /// Creates an unknown-shift violation.
    pub fn unknown_shift(shift_id: ShiftId) -> Self {
        Self::new(
            ViolationType::UnknownShift,
            Some(shift_id),
            None,
            format!("Assignment references unknown shift {shift_id}"),
        )
    }

    /// Creates an unknown-staff violation.
    pub fn unknown_staff(shift_id: ShiftId, staff_id: StaffId) -> Self {
        Self::new(
            ViolationType::UnknownStaff,
            Some(shift_id),
            Some(staff_id),
            format!("Shift {shift_id} is assigned to unknown staff {staff_id}"),
        )
    }

    /// Creates a time-off conflict violation.
    pub fn time_off_conflict(shift_id: ShiftId, staff_id: StaffId) -> Self {
        Self::new(
            ViolationType::TimeOffConflict,
            Some(shift_id),
            Some(staff_id),
            format!("Staff {staff_id} is on time off during shift {shift_id}"),
        )
    }

    /// Creates a rest violation between two shifts held by one staff member.
    pub fn rest_violation(staff_id: StaffId, earlier: ShiftId, later: ShiftId) -> Self {
        Self::new(
            ViolationType::RestViolation,
            Some(later),
            Some(staff_id),
            format!("Staff {staff_id} lacks minimum rest between shifts {earlier} and {later}"),
        )
    }
}

impl Schedule {
    /// Creates an empty schedule with the given status.
    pub fn new(status: SolveStatus) -> Self {
        Self {
            assignments: Vec::new(),
            status,
            objective: None,
            stats: None,
        }
    }

    /// Sets the objective value.
    pub fn with_objective(mut self, objective: i64) -> Self {
        self.objective = Some(objective);
        self
    }

    /// Sets the search statistics.
    pub fn with_stats(mut self, stats: SearchStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Orders assignments by `(start, shift_id)`.
    pub fn sort_chronologically(&mut self) {
        self.assignments.sort_by_key(|a| (a.start, a.shift_id));
    }

    /// Finds the assignment covering a shift.
    pub fn assignment_for_shift(&self, shift_id: ShiftId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.shift_id == shift_id)
    }

    /// Staff member covering a shift.
    pub fn staff_for_shift(&self, shift_id: ShiftId) -> Option<StaffId> {
        self.assignment_for_shift(shift_id).map(|a| a.staff_id)
    }

    /// Returns all assignments held by a staff member.
    pub fn assignments_for_staff(&self, staff_id: StaffId) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.staff_id == staff_id)
            .collect()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the schedule has no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Whether the schedule came from a proven-optimal search.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new(SolveStatus::Heuristic);
        s.add_assignment(Assignment::new(3, 1, at(3, 7), at(4, 7)));
        s.add_assignment(Assignment::new(1, 2, at(1, 7), at(2, 7)));
        s.add_assignment(Assignment::new(2, 1, at(1, 7), at(2, 7)));
        s
    }

    #[test]
    fn test_sort_chronologically() {
        let mut s = sample_schedule();
        s.sort_chronologically();
        let ids: Vec<i64> = s.assignments.iter().map(|a| a.shift_id.0).collect();
        // Same start for 1 and 2 → id decides.
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_assignment_lookup() {
        let s = sample_schedule();
        assert_eq!(s.staff_for_shift(ShiftId(1)), Some(StaffId(2)));
        assert!(s.assignment_for_shift(ShiftId(99)).is_none());
        assert_eq!(s.assignments_for_staff(StaffId(1)).len(), 2);
        assert_eq!(s.assignment_count(), 3);
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new(SolveStatus::Optimal);
        assert!(s.is_empty());
        assert!(s.is_optimal());
        assert_eq!(s.objective, None);
    }

    #[test]
    fn test_with_objective_and_stats() {
        let stats = SearchStats {
            nodes: 10,
            ..SearchStats::default()
        };
        let s = Schedule::new(SolveStatus::Feasible)
            .with_objective(42)
            .with_stats(stats.clone());
        assert_eq!(s.objective, Some(42));
        assert_eq!(s.stats, Some(stats));
        assert!(!s.is_optimal());
    }

    #[test]
    fn test_violation_factories() {
        let v = Violation::uncovered(ShiftId(4));
        assert_eq!(v.violation_type, ViolationType::Uncovered);
        assert_eq!(v.shift_id, Some(ShiftId(4)));

        let v = Violation::time_off_conflict(ShiftId(4), StaffId(2));
        assert_eq!(v.violation_type, ViolationType::TimeOffConflict);
        assert_eq!(v.staff_id, Some(StaffId(2)));

        let v = Violation::rest_violation(StaffId(2), ShiftId(1), ShiftId(4));
        assert_eq!(v.violation_type, ViolationType::RestViolation);
        assert!(v.message.contains("1"));
    }
}
