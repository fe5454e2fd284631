//! CP-based roster formulation.
//!
//! Bridges roster domain models to a boolean assignment model.
//! [`RosterCpBuilder`] builds a [`CpModel`] from staff, shifts, and
//! time-off, then solves it with any [`CpSolver`]. The bundled
//! [`BranchAndBoundSolver`] proves optimality on small rosters and returns
//! the best incumbent when the time budget runs out.
//!
//! # Reference
//! - Baptiste et al. (2001), "Constraint-Based Scheduling"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"

mod builder;
mod model;
mod solver;

pub use builder::RosterCpBuilder;
pub use model::{CpConstraint, CpModel, CpObjective, VarId};
pub use solver::{BranchAndBoundSolver, CpSolution, CpSolver, CpStatus, SolverConfig};
