//! Strategy seam and request container.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::ScheduleError;
use crate::models::{Schedule, Shift, Staff, TimeOffInterval};
use crate::validation::validate_input;

/// Input container for one scheduling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterRequest {
    /// Staff eligible for on-call duty.
    pub staff: Vec<Staff>,
    /// Shifts to cover.
    pub shifts: Vec<Shift>,
    /// Approved leave.
    #[serde(default)]
    pub time_off: Vec<TimeOffInterval>,
}

impl RosterRequest {
    /// Creates a request without time-off.
    pub fn new(staff: Vec<Staff>, shifts: Vec<Shift>) -> Self {
        Self {
            staff,
            shifts,
            time_off: Vec::new(),
        }
    }

    /// Sets time-off intervals.
    pub fn with_time_off(mut self, time_off: Vec<TimeOffInterval>) -> Self {
        self.time_off = time_off;
        self
    }

    /// Validates records and configuration together, collecting every problem.
    pub fn validate(&self, config: &EngineConfig) -> Result<(), ScheduleError> {
        let mut errors = validate_input(&self.staff, &self.shifts, &self.time_off)
            .err()
            .unwrap_or_default();
        if let Err(config_errors) = config.validate() {
            errors.extend(config_errors);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ScheduleError::InvalidInput(errors))
        }
    }
}

/// A way of turning a [`RosterRequest`] into a [`Schedule`].
///
/// Implementations validate the request first and either return a schedule
/// covering every shift exactly once or a typed error. They keep no state
/// between calls.
pub trait SchedulingStrategy: Send + Sync {
    /// Strategy name (for logs).
    fn name(&self) -> &'static str;

    /// Produces a schedule for the request.
    fn schedule(
        &self,
        request: &RosterRequest,
        config: &EngineConfig,
    ) -> Result<Schedule, ScheduleError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;
    use chrono::NaiveDate;

    #[test]
    fn test_validate_collects_input_and_config() {
        let t = NaiveDate::from_ymd_opt(2025, 10, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let request = RosterRequest::new(
            vec![Staff::new(1, "")],
            vec![Shift::new(1, t, t)],
        );
        let config = EngineConfig::default().with_time_limit_secs(0.0);

        let Err(ScheduleError::InvalidInput(errors)) = request.validate(&config) else {
            panic!("expected invalid input");
        };
        let kinds: Vec<ValidationErrorKind> = errors.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&ValidationErrorKind::EmptyName));
        assert!(kinds.contains(&ValidationErrorKind::InvalidTimeRange));
        assert!(kinds.contains(&ValidationErrorKind::InvalidConfig));
    }

    #[test]
    fn test_validate_ok() {
        let request = RosterRequest::new(vec![Staff::new(1, "A")], Vec::new());
        assert!(request.validate(&EngineConfig::default()).is_ok());
    }
}
