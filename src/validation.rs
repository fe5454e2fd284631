//! Input validation for roster requests.
//!
//! Checks structural integrity of staff, shifts, and time-off before
//! any solving attempt. Detects:
//! - Duplicate or non-positive IDs
//! - Empty staff names
//! - Non-positive or non-finite FTE values
//! - Empty or inverted time ranges
//! - Time-off referencing unknown staff
//!
//! All problems are collected rather than stopping at the first one, so a
//! caller can report every broken record at once.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Shift, Staff, TimeOffInterval};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A staff ID is zero or negative.
    InvalidId,
    /// A staff member has an empty name.
    EmptyName,
    /// FTE is zero, negative, or not finite.
    InvalidFte,
    /// An interval has `end <= start`.
    InvalidTimeRange,
    /// Time-off references a staff member that doesn't exist.
    UnknownStaffReference,
    /// A configuration value is out of range.
    InvalidConfig,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a roster request.
///
/// Checks:
/// 1. Staff IDs are positive and unique
/// 2. Staff names are non-empty
/// 3. FTE is finite and > 0
/// 4. Shift IDs are unique
/// 5. Shifts have `end > start`
/// 6. Time-off intervals have `end > start`
/// 7. Time-off references existing staff
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    staff: &[Staff],
    shifts: &[Shift],
    time_off: &[TimeOffInterval],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut staff_ids = HashSet::new();
    for s in staff {
        if s.id.0 <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidId,
                format!("Staff ID must be positive: {}", s.id),
            ));
        }
        if !staff_ids.insert(s.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate staff ID: {}", s.id),
            ));
        }
        if s.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                format!("Staff {} has an empty name", s.id),
            ));
        }
        if !s.fte.is_finite() || s.fte <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidFte,
                format!("Staff {} has invalid FTE {}", s.id, s.fte),
            ));
        }
    }

    let mut shift_ids = HashSet::new();
    for sh in shifts {
        if !shift_ids.insert(sh.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate shift ID: {}", sh.id),
            ));
        }
        if !sh.window().is_well_formed() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeRange,
                format!(
                    "Shift {} ends at or before its start ({} .. {})",
                    sh.id, sh.start, sh.end
                ),
            ));
        }
    }

    for t in time_off {
        if !staff_ids.contains(&t.staff_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownStaffReference,
                format!("Time off references unknown staff {}", t.staff_id),
            ));
        }
        if !t.window().is_well_formed() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeRange,
                format!(
                    "Time off for staff {} ends at or before its start ({} .. {})",
                    t.staff_id, t.start, t.end
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
