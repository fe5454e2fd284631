//! Shift model.
//!
//! A shift is the atomic schedulable unit: one on-call period that needs
//! exactly one staff member. Shifts are never merged, even if they overlap.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TimeWindow;

/// Shift identifier (unique).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(pub i64);

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ShiftId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// An on-call shift to be covered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique shift identifier.
    pub id: ShiftId,
    /// Shift start (inclusive).
    pub start: NaiveDateTime,
    /// Shift end (exclusive, `end > start`).
    pub end: NaiveDateTime,
    /// Free-form tag (e.g. "A", "B", "night").
    pub kind: String,
    /// Weekend shift (weighted by the weekend multiplier).
    pub is_weekend: bool,
    /// Holiday shift (weighted by the holiday multiplier).
    pub is_holiday: bool,
}

impl Shift {
    /// Creates a regular (weekday, non-holiday) shift.
    pub fn new(id: impl Into<ShiftId>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            kind: String::new(),
            is_weekend: false,
            is_holiday: false,
        }
    }

    /// Sets the shift kind tag.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Marks the shift as a weekend shift.
    pub fn with_weekend(mut self, is_weekend: bool) -> Self {
        self.is_weekend = is_weekend;
        self
    }

    /// Marks the shift as a holiday shift.
    pub fn with_holiday(mut self, is_holiday: bool) -> Self {
        self.is_holiday = is_holiday;
        self
    }

    /// The shift as a time window.
    #[inline]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }

    /// Length of the shift.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Processing order key: ascending start, ties broken by id.
    #[inline]
    pub fn order_key(&self) -> (NaiveDateTime, ShiftId) {
        (self.start, self.id)
    }
}

/// Normalizes a textual boolean flag.
///
/// `1`, `true`, `t`, `yes`, `y` (case-insensitive, surrounding whitespace
/// ignored) are `true`; every other value is `false`.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "t" | "yes" | "y"
    )
}
