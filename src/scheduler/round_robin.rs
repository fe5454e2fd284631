//! Round-robin heuristic scheduler.
//!
//! # Algorithm
//!
//! 1. Sort shifts by `(start, id)`.
//! 2. For each shift, try staff starting at a persistent cursor. Every
//!    attempt advances the cursor by one (wrapping), whether or not the
//!    candidate is taken.
//! 3. A candidate is rejected only when their time-off overlaps the shift.
//!
//! Minimum rest and fairness are not enforced; the result is a fast
//! baseline or fallback, not a guaranteed-valid roster under rest rules.
//!
//! # Complexity
//! O(n · m) where n = shifts, m = staff.

use tracing::{debug, info, instrument, warn};

use super::strategy::{RosterRequest, SchedulingStrategy};
use crate::config::EngineConfig;
use crate::error::ScheduleError;
use crate::feasibility::Eligibility;
use crate::models::{Assignment, Schedule, Shift, SolveStatus};

/// Deterministic round-robin scheduler.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, TimeDelta};
/// use u_roster::models::{Shift, Staff, StaffId};
/// use u_roster::scheduler::{RoundRobinScheduler, RosterRequest, SchedulingStrategy};
/// use u_roster::EngineConfig;
///
/// let day = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap().and_hms_opt(7, 0, 0).unwrap();
/// let shifts = vec![
///     Shift::new(1, day, day + TimeDelta::hours(24)),
///     Shift::new(2, day + TimeDelta::hours(24), day + TimeDelta::hours(48)),
/// ];
/// let request = RosterRequest::new(vec![Staff::new(1, "Ada"), Staff::new(2, "Grace")], shifts);
///
/// let schedule = RoundRobinScheduler::new()
///     .schedule(&request, &EngineConfig::default())
///     .unwrap();
/// assert_eq!(schedule.assignments[0].staff_id, StaffId(1));
/// assert_eq!(schedule.assignments[1].staff_id, StaffId(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoundRobinScheduler {
    start_cursor: usize,
}

impl RoundRobinScheduler {
    /// Creates a scheduler starting at the first staff member.
    pub fn new() -> Self {
        Self { start_cursor: 0 }
    }

    /// Sets the initial cursor into the staff list (wrapped to its length).
    pub fn with_start_cursor(mut self, cursor: usize) -> Self {
        self.start_cursor = cursor;
        self
    }

    /// Assigns staff to shifts without validating the request.
    ///
    /// Returns a staff index per shift, in `(start, id)` order of `shifts`.
    fn assign(
        &self,
        request: &RosterRequest,
        shifts: &[Shift],
    ) -> Result<Vec<usize>, ScheduleError> {
        let n = request.staff.len();
        if n == 0 {
            return match shifts.first() {
                Some(first) => Err(ScheduleError::infeasible_shift(first, "no staff to assign")),
                None => Ok(Vec::new()),
            };
        }

        let eligibility = Eligibility::compute(&request.staff, shifts, &request.time_off);
        let mut cursor = self.start_cursor % n;
        let mut chosen = Vec::with_capacity(shifts.len());

        for (row, shift) in shifts.iter().enumerate() {
            let mut pick = None;
            for _ in 0..n {
                let candidate = cursor;
                cursor = (cursor + 1) % n;
                if eligibility.is_eligible(row, candidate) {
                    pick = Some(candidate);
                    break;
                }
                debug!(
                    shift = %shift.id,
                    staff = %request.staff[candidate].id,
                    "candidate on time off"
                );
            }
            match pick {
                Some(col) => chosen.push(col),
                None => {
                    return Err(ScheduleError::infeasible_shift(
                        shift,
                        "every staff member is on time off",
                    ))
                }
            }
        }
        Ok(chosen)
    }
}

impl SchedulingStrategy for RoundRobinScheduler {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    #[instrument(
        skip_all,
        fields(
            strategy = self.name(),
            shifts = request.shifts.len(),
            staff = request.staff.len(),
            cursor = self.start_cursor,
        )
    )]
    fn schedule(
        &self,
        request: &RosterRequest,
        config: &EngineConfig,
    ) -> Result<Schedule, ScheduleError> {
        request.validate(config)?;
        info!("assigning roster round-robin");

        let mut shifts = request.shifts.clone();
        shifts.sort_by_key(Shift::order_key);

        let chosen = self.assign(request, &shifts).inspect_err(|err| {
            warn!(error = %err, "round-robin assignment failed");
        })?;

        let mut schedule = Schedule::new(SolveStatus::Heuristic);
        for (shift, col) in shifts.iter().zip(chosen) {
            schedule.add_assignment(Assignment::new(
                shift.id,
                request.staff[col].id,
                shift.start,
                shift.end,
            ));
        }

        info!(assignments = schedule.assignment_count(), "roster ready");
        Ok(schedule)
    }
}
