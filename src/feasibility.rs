//! Hard-constraint predicates.
//!
//! Pure functions deciding whether a staff member may legally cover a
//! shift (time-off) and whether two shifts may be held by the same person
//! (minimum rest). Both strategies and the post-hoc audit build on these.
//!
//! # Interval Semantics
//! Half-open: `[a_s, a_e)` and `[b_s, b_e)` overlap iff
//! `!(a_e <= b_s || a_s >= b_e)`.

use std::collections::HashMap;

use crate::models::{
    Schedule, Shift, ShiftId, Staff, StaffId, TimeOffInterval, TimeWindow, Violation,
};

/// Whether any of the staff member's time-off overlaps the shift.
///
/// Intervals belonging to other staff are ignored, so the full time-off
/// list may be passed.
pub fn is_blocked(staff: &Staff, shift: &Shift, time_off: &[TimeOffInterval]) -> bool {
    let window = shift.window();
    time_off
        .iter()
        .filter(|t| t.staff_id == staff.id)
        .any(|t| t.window().overlaps(&window))
}

/// Hours between the end of the earlier shift and the start of the later one.
///
/// "Earlier" is decided by `(start, id)`. Negative when the shifts overlap.
pub fn rest_gap_hours(a: &Shift, b: &Shift) -> f64 {
    let (earlier, later) = if a.order_key() <= b.order_key() {
        (a, b)
    } else {
        (b, a)
    };
    (later.start - earlier.end).num_milliseconds() as f64 / 3_600_000.0
}

/// Whether one person holding both shifts breaks the minimum rest window.
///
/// Symmetric in its shift arguments. Overlapping shifts always violate.
pub fn rest_violation(a: &Shift, b: &Shift, min_rest_hours: f64) -> bool {
    rest_gap_hours(a, b) < min_rest_hours
}

/// Pairs `(i, j)`, `i < j`, of shifts that may not share a staff member.
///
/// `shifts` must be sorted by [`Shift::order_key`]. For a fixed `i` the gap
/// grows with `j`, so the scan stops at the first compatible successor.
pub fn rest_conflicts(shifts: &[Shift], min_rest_hours: f64) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..shifts.len() {
        for j in (i + 1)..shifts.len() {
            if rest_violation(&shifts[i], &shifts[j], min_rest_hours) {
                pairs.push((i, j));
            } else {
                break;
            }
        }
    }
    pairs
}

/// Precomputed time-off blocking for every (shift, staff) pair.
#[derive(Debug, Clone)]
pub struct Eligibility {
    // blocked[shift][staff]
    blocked: Vec<Vec<bool>>,
}

impl Eligibility {
    /// Evaluates [`is_blocked`] for all pairs.
    pub fn compute(staff: &[Staff], shifts: &[Shift], time_off: &[TimeOffInterval]) -> Self {
        let mut leave: HashMap<StaffId, Vec<TimeWindow>> = HashMap::new();
        for t in time_off {
            leave.entry(t.staff_id).or_default().push(t.window());
        }

        let blocked = shifts
            .iter()
            .map(|shift| {
                let window = shift.window();
                staff
                    .iter()
                    .map(|s| {
                        leave
                            .get(&s.id)
                            .is_some_and(|ws| ws.iter().any(|w| w.overlaps(&window)))
                    })
                    .collect()
            })
            .collect();

        Self { blocked }
    }

    /// Whether staff `staff_idx` may cover shift `shift_idx`.
    #[inline]
    pub fn is_eligible(&self, shift_idx: usize, staff_idx: usize) -> bool {
        !self.blocked[shift_idx][staff_idx]
    }

    /// Indices of staff who may cover a shift.
    pub fn eligible_staff(&self, shift_idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.blocked[shift_idx]
            .iter()
            .enumerate()
            .filter(|(_, blocked)| !**blocked)
            .map(|(i, _)| i)
    }

    /// First shift index nobody can cover.
    pub fn first_uncoverable(&self) -> Option<usize> {
        self.blocked
            .iter()
            .position(|row| row.iter().all(|&b| b))
    }
}

/// Checks a schedule against every hard constraint.
///
/// Reports uncovered and double-covered shifts, references to unknown
/// shifts or staff, time-off conflicts, and rest violations. An empty
/// result means the schedule is fully valid for `min_rest_hours`.
pub fn audit_schedule(
    schedule: &Schedule,
    staff: &[Staff],
    shifts: &[Shift],
    time_off: &[TimeOffInterval],
    min_rest_hours: f64,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let shift_by_id: HashMap<ShiftId, &Shift> = shifts.iter().map(|s| (s.id, s)).collect();
    let staff_by_id: HashMap<StaffId, &Staff> = staff.iter().map(|s| (s.id, s)).collect();

    let mut coverage: HashMap<ShiftId, usize> = HashMap::new();
    let mut held: HashMap<StaffId, Vec<&Shift>> = HashMap::new();

    for a in &schedule.assignments {
        *coverage.entry(a.shift_id).or_insert(0) += 1;

        let Some(&shift) = shift_by_id.get(&a.shift_id) else {
            violations.push(Violation::unknown_shift(a.shift_id));
            continue;
        };
        let Some(&member) = staff_by_id.get(&a.staff_id) else {
            violations.push(Violation::unknown_staff(a.shift_id, a.staff_id));
            continue;
        };

        if is_blocked(member, shift, time_off) {
            violations.push(Violation::time_off_conflict(shift.id, member.id));
        }
        held.entry(member.id).or_default().push(shift);
    }

    for shift in shifts {
        match coverage.get(&shift.id).copied().unwrap_or(0) {
            0 => violations.push(Violation::uncovered(shift.id)),
            1 => {}
            n => violations.push(Violation::double_covered(shift.id, n)),
        }
    }

    let mut staff_ids: Vec<StaffId> = held.keys().copied().collect();
    staff_ids.sort();
    for staff_id in staff_ids {
        let Some(list) = held.get_mut(&staff_id) else {
            continue;
        };
        list.sort_by_key(|s| s.order_key());
        for i in 0..list.len() {
            for j in (i + 1)..list.len() {
                if rest_violation(list[i], list[j], min_rest_hours) {
                    violations.push(Violation::rest_violation(staff_id, list[i].id, list[j].id));
                }
            }
        }
    }

    violations
}
