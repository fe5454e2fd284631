//! Time windows and staff time-off.
//!
//! # Time Model
//! Timestamps are naive wall-clock date-times (`chrono::NaiveDateTime`).
//! The caller decides which timezone they are expressed in; all inputs of
//! one run must agree.
//!
//! # Interval Semantics
//! All intervals are half-open `[start, end)`: a shift ending at 08:00 does
//! not overlap time-off starting at 08:00.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::StaffId;

/// A half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Length of the window.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether `end > start`.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.end > self.start
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether two windows overlap.
    ///
    /// `[a_s, a_e)` and `[b_s, b_e)` overlap iff `!(a_e <= b_s || a_s >= b_e)`.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }
}

/// A period during which a staff member cannot be assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffInterval {
    /// Staff member on leave.
    pub staff_id: StaffId,
    /// Leave start (inclusive).
    pub start: NaiveDateTime,
    /// Leave end (exclusive).
    pub end: NaiveDateTime,
}

impl TimeOffInterval {
    /// Creates a time-off interval.
    pub fn new(staff_id: impl Into<StaffId>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            staff_id: staff_id.into(),
            start,
            end,
        }
    }

    /// The interval as a time window.
    #[inline]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_window_duration() {
        let w = TimeWindow::new(at(1, 7), at(2, 7));
        assert_eq!(w.duration(), TimeDelta::hours(24));
        assert!(w.is_well_formed());
        assert!(!TimeWindow::new(at(2, 7), at(2, 7)).is_well_formed());
    }

    #[test]
    fn test_window_contains_half_open() {
        let w = TimeWindow::new(at(1, 7), at(1, 19));
        assert!(w.contains(at(1, 7)));
        assert!(w.contains(at(1, 18)));
        assert!(!w.contains(at(1, 19)));
        assert!(!w.contains(at(1, 6)));
    }

    #[test]
    fn test_window_overlap() {
        let a = TimeWindow::new(at(1, 7), at(1, 19));
        let b = TimeWindow::new(at(1, 18), at(2, 7));
        let c = TimeWindow::new(at(1, 19), at(2, 7));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Touching endpoints do not overlap.
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_window_containment_overlaps() {
        let outer = TimeWindow::new(at(1, 0), at(5, 0));
        let inner = TimeWindow::new(at(2, 7), at(2, 19));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_time_off_window() {
        let t = TimeOffInterval::new(3, at(1, 0), at(3, 0));
        assert_eq!(t.staff_id, StaffId(3));
        assert_eq!(t.window(), TimeWindow::new(at(1, 0), at(3, 0)));
    }
}
