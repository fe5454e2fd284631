//! Solver interface and the bundled branch-and-bound solver.
//!
//! # Algorithm
//!
//! `BranchAndBoundSolver` runs a depth-first search over rows:
//!
//! 1. **Variable selection**: the unassigned row with the fewest remaining
//!    columns (MRV), ties broken by row index.
//! 2. **Value ordering**: columns that add no adjacency penalty first, then
//!    the column furthest below its load target, then column index.
//! 3. **Propagation**: assigning `(row, col)` disables every cell that
//!    shares an `AtMostOne` constraint with it (forward checking). A row
//!    left without columns is a dead end.
//! 4. **Bounding**: with `E` the total excess over target, `S` the total
//!    shortfall and `R` the load still to be placed, the deviation term is
//!    at least `E + |S − R|`. Nodes whose bound cannot beat the incumbent
//!    are pruned.
//!
//! The clock is consulted every `clock_check_mask + 1` nodes; once the
//! budget is spent the best incumbent (if any) is returned.
//!
//! # Reference
//! Baptiste et al. (2001), "Constraint-Based Scheduling", Ch. 1

use std::time::{Duration, Instant};

use tracing::debug;

use super::model::{CpConstraint, CpModel};
use crate::models::SearchStats;

/// Outcome class of a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpStatus {
    /// The search tree was exhausted; the solution is optimal.
    Optimal,
    /// A solution was found but the budget ran out before proving optimality.
    Feasible,
    /// The search tree was exhausted without any solution.
    Infeasible,
    /// The budget ran out before any solution was found.
    Timeout,
    /// The objective cannot be evaluated in `i64` (see
    /// [`CpModel::objective_bound`]); no search was attempted.
    InvalidModel,
}

/// Solver limits.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Wall-clock budget.
    pub time_limit: Duration,
    /// Clock is checked when `nodes & clock_check_mask == 0`.
    pub clock_check_mask: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(5),
            clock_check_mask: 0xFF,
        }
    }
}

impl SolverConfig {
    /// Creates a config with the given budget.
    pub fn with_time_limit(time_limit: Duration) -> Self {
        Self {
            time_limit,
            ..Self::default()
        }
    }
}

/// Result of a solve call.
#[derive(Debug, Clone)]
pub struct CpSolution {
    /// Outcome class.
    pub status: CpStatus,
    /// `values[row] = col` of the best solution; empty if none was found.
    pub values: Vec<usize>,
    /// Objective of the best solution.
    pub objective: Option<i64>,
    /// Search counters.
    pub stats: SearchStats,
    /// Row that caused the most dead ends (diagnostic for infeasibility).
    pub critical_row: Option<usize>,
}

impl CpSolution {
    /// Whether a solution (optimal or not) was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, CpStatus::Optimal | CpStatus::Feasible)
    }
}

/// A solver for [`CpModel`]s.
///
/// Implementations must return only solutions satisfying every hard
/// constraint of the model, and must respect `config.time_limit`.
pub trait CpSolver: Send + Sync {
    /// Solver name (for logs).
    fn name(&self) -> &'static str;

    /// Solves the model within the configured budget.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}

/// Depth-first branch-and-bound solver with forward checking.
#[derive(Debug, Clone, Default)]
pub struct BranchAndBoundSolver;

impl BranchAndBoundSolver {
    /// Creates a new solver.
    pub fn new() -> Self {
        Self
    }
}

impl CpSolver for BranchAndBoundSolver {
    fn name(&self) -> &'static str {
        "branch-and-bound"
    }

    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        // Every running sum in the search is bounded by the objective bound.
        if model.objective_bound().is_none() {
            debug!(model = %model.name, "objective overflows i64, model rejected");
            return CpSolution {
                status: CpStatus::InvalidModel,
                values: Vec::new(),
                objective: None,
                stats: SearchStats::default(),
                critical_row: None,
            };
        }
        let mut search = Search::new(model, config);
        search.run();
        search.into_solution()
    }
}

struct Search<'m> {
    model: &'m CpModel,
    started: Instant,
    time_limit: Duration,
    clock_check_mask: u64,

    // Static structure, indexed by var = row * cols + col.
    conflicts: Vec<Vec<usize>>,
    adjacency: Vec<Vec<usize>>,

    // Dynamic state.
    values: Vec<Option<usize>>,
    blocks: Vec<u32>,
    domain_size: Vec<usize>,
    load: Vec<i64>,
    remaining_load: i64,
    hits: i64,
    unassigned: usize,

    best: Option<(i64, Vec<usize>)>,
    root_bound: i64,
    failures: Vec<u64>,
    stats: SearchStats,
    timed_out: bool,
    proven: bool,
}

impl<'m> Search<'m> {
    fn new(model: &'m CpModel, config: &SolverConfig) -> Self {
        let rows = model.rows;
        let cols = model.cols;
        let var = |row: usize, col: usize| row * cols + col;

        let mut conflicts = vec![Vec::new(); rows * cols];
        let mut blocks = vec![0_u32; rows * cols];
        for constraint in &model.constraints {
            match *constraint {
                CpConstraint::Forbidden(v) if v.row < rows && v.col < cols => {
                    blocks[var(v.row, v.col)] = 1;
                }
                CpConstraint::AtMostOne(a, b)
                    if a.row < rows && a.col < cols && b.row < rows && b.col < cols =>
                {
                    if a.row != b.row {
                        conflicts[var(a.row, a.col)].push(var(b.row, b.col));
                        conflicts[var(b.row, b.col)].push(var(a.row, a.col));
                    }
                }
                _ => {}
            }
        }

        let mut adjacency = vec![Vec::new(); rows];
        for &(a, b) in &model.objective.adjacent_rows {
            if a < rows && b < rows && a != b {
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
        }

        let domain_size = (0..rows)
            .map(|row| (0..cols).filter(|&col| blocks[var(row, col)] == 0).count())
            .collect();

        let remaining_load = (0..rows).map(|row| Self::row_weight(model, row)).sum();

        Self {
            model,
            started: Instant::now(),
            time_limit: config.time_limit,
            clock_check_mask: config.clock_check_mask,
            conflicts,
            adjacency,
            values: vec![None; rows],
            blocks,
            domain_size,
            load: vec![0; cols],
            remaining_load,
            hits: 0,
            unassigned: rows,
            best: None,
            root_bound: 0,
            failures: vec![0; rows],
            stats: SearchStats::default(),
            timed_out: false,
            proven: false,
        }
    }

    fn row_weight(model: &CpModel, row: usize) -> i64 {
        model.objective.row_weights.get(row).copied().unwrap_or(0)
    }

    fn col_target(&self, col: usize) -> i64 {
        self.model.objective.col_targets.get(col).copied().unwrap_or(0)
    }

    fn run(&mut self) {
        if let Some(row) = self.domain_size.iter().position(|&d| d == 0) {
            // Some row has no admissible column at all.
            self.failures[row] += 1;
            self.stats.backtracks += 1;
            return;
        }
        if self.time_limit.is_zero() {
            self.timed_out = true;
            return;
        }
        self.root_bound = self.bound();
        self.dfs();
    }

    fn should_stop(&self) -> bool {
        self.timed_out || self.proven
    }

    fn check_clock(&mut self) {
        if (self.stats.nodes & self.clock_check_mask) == 0
            && self.started.elapsed() >= self.time_limit
        {
            self.timed_out = true;
        }
    }

    /// Admissible lower bound of any completion of the current partial assignment.
    fn bound(&self) -> i64 {
        let mut excess = 0;
        let mut shortfall = 0;
        for col in 0..self.model.cols {
            let diff = self.load[col] - self.col_target(col);
            if diff > 0 {
                excess += diff;
            } else {
                shortfall -= diff;
            }
        }
        let deviation = excess + (shortfall - self.remaining_load).abs();
        let obj = &self.model.objective;
        obj.deviation_weight * deviation + obj.adjacency_weight * self.hits
    }

    fn dfs(&mut self) {
        self.stats.nodes += 1;
        self.check_clock();
        if self.should_stop() {
            return;
        }

        let bound = self.bound();
        if let Some((best, _)) = &self.best {
            if bound >= *best {
                self.stats.backtracks += 1;
                return;
            }
        }

        if self.unassigned == 0 {
            self.record_solution(bound);
            return;
        }

        let Some(row) = self.select_row() else {
            return;
        };

        for col in self.ordered_values(row) {
            let wiped = self.assign(row, col);
            match wiped {
                Some(dead_row) => {
                    self.failures[dead_row] += 1;
                    self.stats.backtracks += 1;
                }
                None => self.dfs(),
            }
            self.unassign(row, col);
            if self.should_stop() {
                return;
            }
        }
    }

    fn record_solution(&mut self, objective: i64) {
        let values: Vec<usize> = self.values.iter().map(|v| v.unwrap_or(0)).collect();
        debug_assert!(self.model.is_feasible(&values));
        self.stats.solutions += 1;
        debug!(
            objective,
            nodes = self.stats.nodes,
            "improving solution found"
        );
        self.best = Some((objective, values));
        if objective <= self.root_bound {
            self.proven = true;
        }
    }

    fn select_row(&self) -> Option<usize> {
        (0..self.model.rows)
            .filter(|&row| self.values[row].is_none())
            .min_by_key(|&row| (self.domain_size[row], row))
    }

    fn adjacency_cost(&self, row: usize, col: usize) -> i64 {
        self.adjacency[row]
            .iter()
            .filter(|&&other| self.values[other] == Some(col))
            .count() as i64
    }

    fn ordered_values(&self, row: usize) -> Vec<usize> {
        let cols = self.model.cols;
        let mut candidates: Vec<(i64, i64, usize)> = (0..cols)
            .filter(|&col| self.blocks[row * cols + col] == 0)
            .map(|col| {
                let deficit = self.col_target(col) - self.load[col];
                (self.adjacency_cost(row, col), -deficit, col)
            })
            .collect();
        candidates.sort_unstable();
        candidates.into_iter().map(|(_, _, col)| col).collect()
    }

    /// Applies `row := col`; returns a row whose domain was wiped out, if any.
    fn assign(&mut self, row: usize, col: usize) -> Option<usize> {
        let cols = self.model.cols;
        self.hits += self.adjacency_cost(row, col);
        self.values[row] = Some(col);
        self.unassigned -= 1;
        let weight = Self::row_weight(self.model, row);
        self.load[col] += weight;
        self.remaining_load -= weight;

        let mut wiped = None;
        for i in 0..self.conflicts[row * cols + col].len() {
            let other = self.conflicts[row * cols + col][i];
            let other_row = other / cols;
            if self.values[other_row].is_some() {
                continue;
            }
            self.blocks[other] += 1;
            if self.blocks[other] == 1 {
                self.domain_size[other_row] -= 1;
                if self.domain_size[other_row] == 0 && wiped.is_none() {
                    wiped = Some(other_row);
                }
            }
        }
        wiped
    }

    fn unassign(&mut self, row: usize, col: usize) {
        let cols = self.model.cols;
        for i in 0..self.conflicts[row * cols + col].len() {
            let other = self.conflicts[row * cols + col][i];
            let other_row = other / cols;
            if self.values[other_row].is_some() {
                continue;
            }
            self.blocks[other] -= 1;
            if self.blocks[other] == 0 {
                self.domain_size[other_row] += 1;
            }
        }

        let weight = Self::row_weight(self.model, row);
        self.load[col] -= weight;
        self.remaining_load += weight;
        self.unassigned += 1;
        self.values[row] = None;
        self.hits -= self.adjacency_cost(row, col);
    }

    fn into_solution(mut self) -> CpSolution {
        self.stats.elapsed = self.started.elapsed();

        let status = match (&self.best, self.timed_out) {
            (Some(_), false) => CpStatus::Optimal,
            (Some(_), true) => CpStatus::Feasible,
            (None, false) => CpStatus::Infeasible,
            (None, true) => CpStatus::Timeout,
        };

        let critical_row = self
            .failures
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .max_by_key(|&(row, &count)| (count, std::cmp::Reverse(row)))
            .map(|(row, _)| row);

        debug!(
            model = %self.model.name,
            ?status,
            nodes = self.stats.nodes,
            backtracks = self.stats.backtracks,
            solutions = self.stats.solutions,
            elapsed_ms = self.stats.elapsed.as_millis() as u64,
            "search finished"
        );

        let (objective, values) = match self.best {
            Some((objective, values)) => (Some(objective), values),
            None => (None, Vec::new()),
        };

        CpSolution {
            status,
            values,
            objective,
            stats: self.stats,
            critical_row,
        }
    }
}
