//! Errors returned by scheduling strategies.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Shift, ShiftId};
use crate::validation::ValidationError;

/// Identifies a shift in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    /// Shift identifier.
    pub id: ShiftId,
    /// Shift start.
    pub start: NaiveDateTime,
    /// Shift end.
    pub end: NaiveDateTime,
}

impl From<&Shift> for ShiftWindow {
    fn from(shift: &Shift) -> Self {
        Self {
            id: shift.id,
            start: shift.start,
            end: shift.end,
        }
    }
}

impl fmt::Display for ShiftWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shift {} ({} .. {})", self.id, self.start, self.end)
    }
}

/// Terminal failure of a scheduling run.
///
/// None of these are retried by the engine; the caller decides whether to
/// relax constraints or switch strategies.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// Malformed input records or configuration, detected before solving.
    #[error("invalid input: {}", join_messages(.0))]
    InvalidInput(Vec<ValidationError>),

    /// No assignment satisfies every hard constraint.
    #[error("no feasible schedule: {reason}")]
    Infeasible {
        /// The shift that could not be covered, when identifiable.
        shift: Option<ShiftWindow>,
        /// Human-readable diagnosis.
        reason: String,
    },

    /// The solver used its whole time budget without finding any feasible schedule.
    #[error("solver time limit of {limit:?} reached without a feasible schedule")]
    SolverTimeout {
        /// The exhausted budget.
        limit: Duration,
    },
}

impl ScheduleError {
    pub(crate) fn infeasible_shift(shift: &Shift, reason: impl Into<String>) -> Self {
        let window = ShiftWindow::from(shift);
        Self::Infeasible {
            shift: Some(window),
            reason: format!("{window}: {}", reason.into()),
        }
    }

    /// The blocking shift, for infeasibility errors that identify one.
    pub fn blocking_shift(&self) -> Option<ShiftId> {
        match self {
            Self::Infeasible {
                shift: Some(window),
                ..
            } => Some(window.id),
            _ => None,
        }
    }
}

impl From<Vec<ValidationError>> for ScheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::InvalidInput(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
