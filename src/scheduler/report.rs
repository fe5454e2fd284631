//! Schedule fairness report.
//!
//! Aggregates a completed schedule per staff member against the
//! FTE-proportional targets of its request.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Shift count | Assignments held |
//! | Weighted total | Σ shift weight over assignments held |
//! | Weekend / holiday count | Assignments on flagged shifts |
//! | Target share | `total weight × fte / Σ fte` |
//! | Deviation | weighted total − target share |
//! | Consecutive hits | Pairs of adjacent shifts (in `(start, id)` order) held by one person |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::strategy::RosterRequest;
use crate::config::FairnessWeights;
use crate::fairness::{shift_weight, FairnessProfile};
use crate::models::{Schedule, Shift, ShiftId, StaffId};

/// Per-staff aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffSummary {
    /// Staff identifier.
    pub staff_id: StaffId,
    /// Display name.
    pub name: String,
    /// Shifts held.
    pub shift_count: usize,
    /// Sum of weights of shifts held.
    pub weighted_total: f64,
    /// Weekend shifts held.
    pub weekend_count: usize,
    /// Holiday shifts held.
    pub holiday_count: usize,
    /// FTE-proportional fair share.
    pub target_share: f64,
    /// `weighted_total − target_share`.
    pub deviation: f64,
}

/// Fairness summary of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    /// One entry per staff member, in request order.
    pub staff: Vec<StaffSummary>,
    /// Sum of all shift weights in the request.
    pub total_weight: f64,
    /// Σ |deviation| over staff.
    pub total_abs_deviation: f64,
    /// Adjacent shift pairs held by the same person.
    pub consecutive_hits: usize,
}

impl ScheduleReport {
    /// Computes the report.
    ///
    /// Assignments referring to shifts or staff outside the request are
    /// ignored; staff without assignments are reported with zeros.
    pub fn calculate(
        schedule: &Schedule,
        request: &RosterRequest,
        weights: &FairnessWeights,
    ) -> Self {
        let profile = FairnessProfile::compute(&request.staff, &request.shifts, weights);
        let shift_by_id: HashMap<ShiftId, &Shift> =
            request.shifts.iter().map(|s| (s.id, s)).collect();
        let index_by_staff: HashMap<StaffId, usize> = request
            .staff
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, i))
            .collect();

        let mut staff: Vec<StaffSummary> = request
            .staff
            .iter()
            .zip(&profile.targets)
            .map(|(s, &target)| StaffSummary {
                staff_id: s.id,
                name: s.name.clone(),
                shift_count: 0,
                weighted_total: 0.0,
                weekend_count: 0,
                holiday_count: 0,
                target_share: target,
                deviation: 0.0,
            })
            .collect();

        for a in &schedule.assignments {
            let (Some(&shift), Some(&idx)) =
                (shift_by_id.get(&a.shift_id), index_by_staff.get(&a.staff_id))
            else {
                continue;
            };
            let summary = &mut staff[idx];
            summary.shift_count += 1;
            summary.weighted_total += shift_weight(shift, weights);
            if shift.is_weekend {
                summary.weekend_count += 1;
            }
            if shift.is_holiday {
                summary.holiday_count += 1;
            }
        }

        for summary in &mut staff {
            summary.deviation = summary.weighted_total - summary.target_share;
        }
        let total_abs_deviation = staff.iter().map(|s| s.deviation.abs()).sum();

        let mut ordered: Vec<&Shift> = request.shifts.iter().collect();
        ordered.sort_by_key(|s| s.order_key());
        let consecutive_hits = ordered
            .windows(2)
            .filter(|pair| {
                let first = schedule.staff_for_shift(pair[0].id);
                first.is_some() && first == schedule.staff_for_shift(pair[1].id)
            })
            .count();

        Self {
            staff,
            total_weight: profile.total_weight,
            total_abs_deviation,
            consecutive_hits,
        }
    }

    /// Summary of one staff member.
    pub fn summary_for(&self, staff_id: StaffId) -> Option<&StaffSummary> {
        self.staff.iter().find(|s| s.staff_id == staff_id)
    }

    /// Largest absolute deviation of any staff member.
    pub fn max_abs_deviation(&self) -> f64 {
        self.staff
            .iter()
            .map(|s| s.deviation.abs())
            .fold(0.0, f64::max)
    }
}
