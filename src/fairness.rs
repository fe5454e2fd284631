//! Fairness weighting.
//!
//! Every shift carries a workload weight; every staff member is owed a
//! share of the total weight proportional to their FTE.
//!
//! | Quantity | Definition |
//! |----------|-----------|
//! | weight(shift) | `1.0 × weekend (if weekend) × holiday (if holiday)` |
//! | target(staff) | `Σ weight × fte / Σ fte` |
//! | deviation(staff) | `assigned weighted total − target` |
//!
//! Weights and targets are computed once per run. The optimizer works on
//! fixed-point integers (see [`to_fixed`]) so no floating-point arithmetic
//! happens inside the search.

use serde::{Deserialize, Serialize};

use crate::config::FairnessWeights;
use crate::models::{Shift, Staff};

/// Workload weight of one shift. Multipliers compose multiplicatively.
pub fn shift_weight(shift: &Shift, weights: &FairnessWeights) -> f64 {
    let mut w = 1.0;
    if shift.is_weekend {
        w *= weights.weekend;
    }
    if shift.is_holiday {
        w *= weights.holiday;
    }
    w
}

/// Sum of shift weights.
pub fn total_weight(shifts: &[Shift], weights: &FairnessWeights) -> f64 {
    shifts.iter().map(|s| shift_weight(s, weights)).sum()
}

/// Fair share of `total_weight` owed to a staff member.
///
/// Returns 0 when the roster's total FTE is not positive.
pub fn target_share(member: &Staff, staff: &[Staff], total_weight: f64) -> f64 {
    let total_fte: f64 = staff.iter().map(|s| s.fte).sum();
    if total_fte > 0.0 {
        total_weight * member.fte / total_fte
    } else {
        0.0
    }
}

/// Converts a real quantity to fixed point (`round(value × scale)`).
#[inline]
pub fn to_fixed(value: f64, scale: i64) -> i64 {
    (value * scale as f64).round() as i64
}

/// Per-run weights and targets.
///
/// `weights[i]` belongs to `shifts[i]` and `targets[j]` to `staff[j]` of the
/// slices passed to [`FairnessProfile::compute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessProfile {
    /// Weight per shift.
    pub weights: Vec<f64>,
    /// Target share per staff member.
    pub targets: Vec<f64>,
    /// Sum of all shift weights.
    pub total_weight: f64,
}

impl FairnessProfile {
    /// Computes weights and FTE-proportional targets.
    pub fn compute(staff: &[Staff], shifts: &[Shift], weights: &FairnessWeights) -> Self {
        let shift_weights: Vec<f64> = shifts.iter().map(|s| shift_weight(s, weights)).collect();
        let total: f64 = shift_weights.iter().sum();
        let targets = staff.iter().map(|s| target_share(s, staff, total)).collect();

        Self {
            weights: shift_weights,
            targets,
            total_weight: total,
        }
    }

    /// Shift weights in fixed point.
    pub fn fixed_weights(&self, scale: i64) -> Vec<i64> {
        self.weights.iter().map(|&w| to_fixed(w, scale)).collect()
    }

    /// Staff targets in fixed point.
    pub fn fixed_targets(&self, scale: i64) -> Vec<i64> {
        self.targets.iter().map(|&t| to_fixed(t, scale)).collect()
    }

    /// Deviation of a staff member holding `assigned_weight`.
    ///
    /// `None` if `staff_idx` is outside the profile.
    pub fn deviation(&self, staff_idx: usize, assigned_weight: f64) -> Option<f64> {
        self.targets.get(staff_idx).map(|target| assigned_weight - target)
    }
}
