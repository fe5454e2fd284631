//! Staff model.
//!
//! Staff members are the resources a roster assigns to shifts. Each one
//! carries an FTE (full-time equivalent) factor that sets its relative
//! share of the weighted workload.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Staff identifier (unique, positive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(pub i64);

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StaffId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A staff member who can cover on-call shifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    /// Unique staff identifier.
    pub id: StaffId,
    /// Display name (non-empty).
    pub name: String,
    /// Relative availability / workload share (> 0, 1.0 = full time).
    pub fte: f64,
}

impl Staff {
    /// Creates a full-time staff member.
    pub fn new(id: impl Into<StaffId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fte: 1.0,
        }
    }

    /// Sets the FTE factor.
    pub fn with_fte(mut self, fte: f64) -> Self {
        self.fte = fte;
        self
    }
}
