//! Boolean assignment model.
//!
//! The model is a grid of boolean decision variables `x[row][col]`
//! ("row is covered by col"). Coverage is structural: every row selects
//! exactly one column, so a solution is a vector `values[row] = col`.
//! On top of that, constraints can forbid single cells or forbid two cells
//! from being true together, and a fixed-point objective combines an
//! absolute load deviation per column with a penalty for adjacent rows
//! sharing a column.

use serde::{Deserialize, Serialize};

/// A decision variable `x[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarId {
    /// Row (shift) index.
    pub row: usize,
    /// Column (staff) index.
    pub col: usize,
}

impl VarId {
    /// Creates a variable reference.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A hard constraint on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpConstraint {
    /// The variable must be false.
    Forbidden(VarId),
    /// At most one of the two variables may be true.
    AtMostOne(VarId, VarId),
}

/// Minimized objective, all terms in fixed point.
///
/// `deviation_weight × Σ_col |Σ_row weight[row]·x[row][col] − target[col]|
///  + adjacency_weight × #{(a, b) ∈ adjacent_rows : a and b share a column}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpObjective {
    /// Load contributed by each row.
    pub row_weights: Vec<i64>,
    /// Target load per column.
    pub col_targets: Vec<i64>,
    /// Coefficient of the total absolute deviation.
    pub deviation_weight: i64,
    /// Row pairs penalized when covered by the same column.
    pub adjacent_rows: Vec<(usize, usize)>,
    /// Coefficient of each adjacency hit.
    pub adjacency_weight: i64,
}

/// A complete optimization problem handed to a [`CpSolver`](super::CpSolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpModel {
    /// Model name (diagnostics only).
    pub name: String,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Hard constraints.
    pub constraints: Vec<CpConstraint>,
    /// Objective.
    pub objective: CpObjective,
}

impl CpModel {
    /// Creates an unconstrained `rows × cols` model with a zero objective.
    pub fn new(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            name: name.into(),
            rows,
            cols,
            constraints: Vec::new(),
            objective: CpObjective {
                row_weights: vec![0; rows],
                col_targets: vec![0; cols],
                ..CpObjective::default()
            },
        }
    }

    /// Forces a variable to false.
    pub fn forbid(&mut self, var: VarId) {
        self.constraints.push(CpConstraint::Forbidden(var));
    }

    /// Allows at most one of two variables to be true.
    pub fn add_at_most_one(&mut self, a: VarId, b: VarId) {
        self.constraints.push(CpConstraint::AtMostOne(a, b));
    }

    /// Replaces the objective.
    pub fn set_objective(&mut self, objective: CpObjective) {
        self.objective = objective;
    }

    /// Number of boolean decision variables.
    pub fn var_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of explicit constraints (coverage is structural and not counted).
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Whether `values` (row → column) satisfies every hard constraint.
    pub fn is_feasible(&self, values: &[usize]) -> bool {
        if values.len() != self.rows || values.iter().any(|&c| c >= self.cols) {
            return false;
        }
        let holds = |v: &VarId| values.get(v.row) == Some(&v.col);
        self.constraints.iter().all(|c| match c {
            CpConstraint::Forbidden(v) => !holds(v),
            CpConstraint::AtMostOne(a, b) => !(holds(a) && holds(b)),
        })
    }

    /// Upper bound on the objective of any assignment, if it fits in `i64`.
    ///
    /// `Σ|load − target| ≤ Σ weight + Σ target`, so every intermediate value
    /// of [`evaluate`](Self::evaluate) or a search over this model stays
    /// within the returned bound. `None` means the model cannot be
    /// evaluated without overflow. Negative weights or targets also give
    /// `None`.
    pub fn objective_bound(&self) -> Option<i64> {
        let obj = &self.objective;
        let non_negative_sum = |xs: &[i64]| {
            xs.iter()
                .try_fold(0_i64, |acc, &x| if x < 0 { None } else { acc.checked_add(x) })
        };
        let deviation = non_negative_sum(&obj.row_weights)?
            .checked_add(non_negative_sum(&obj.col_targets)?)?;
        let hits = i64::try_from(obj.adjacent_rows.len()).ok()?;
        if obj.deviation_weight < 0 || obj.adjacency_weight < 0 {
            return None;
        }
        obj.deviation_weight
            .checked_mul(deviation)?
            .checked_add(obj.adjacency_weight.checked_mul(hits)?)
    }

    /// Objective value of a complete assignment, ignoring hard constraints.
    ///
    /// Returns `None` if `values` is not a complete assignment of this grid,
    /// or if the value does not fit in `i64`.
    pub fn evaluate(&self, values: &[usize]) -> Option<i64> {
        if values.len() != self.rows || values.iter().any(|&c| c >= self.cols) {
            return None;
        }
        let obj = &self.objective;

        let mut load = vec![0_i64; self.cols];
        for (row, &col) in values.iter().enumerate() {
            let weight = obj.row_weights.get(row).copied().unwrap_or(0);
            load[col] = load[col].checked_add(weight)?;
        }
        let mut deviation = 0_i64;
        for (col, &l) in load.iter().enumerate() {
            let target = obj.col_targets.get(col).copied().unwrap_or(0);
            deviation = deviation.checked_add(l.checked_sub(target)?.checked_abs()?)?;
        }

        let hits = obj
            .adjacent_rows
            .iter()
            .filter(|&&(a, b)| values.get(a).is_some() && values.get(a) == values.get(b))
            .count() as i64;

        obj.deviation_weight
            .checked_mul(deviation)?
            .checked_add(obj.adjacency_weight.checked_mul(hits)?)
    }
}
