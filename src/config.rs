//! Per-run engine configuration.
//!
//! Configuration is passed into every scheduling call; nothing is held in
//! global state between runs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::validation::{ValidationError, ValidationErrorKind};

/// Largest fixed-point weight of a single shift (2^53, exact in `f64`).
const MAX_FIXED_SHIFT_WEIGHT: f64 = 9_007_199_254_740_992.0;

/// Shift weighting multipliers used for fairness accounting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairnessWeights {
    /// Multiplier applied to weekend shifts.
    pub weekend: f64,
    /// Multiplier applied to holiday shifts.
    pub holiday: f64,
}

impl Default for FairnessWeights {
    fn default() -> Self {
        Self {
            weekend: 1.5,
            holiday: 2.0,
        }
    }
}

/// Configuration of one scheduling run.
///
/// # Example
/// ```
/// use u_roster::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_weekend_weight(2.0)
///     .with_min_rest_hours(12.0)
///     .with_time_limit_secs(1.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Weekend shift multiplier (≥ 0, default 1.5).
    pub weekend_weight: f64,
    /// Holiday shift multiplier (≥ 0, default 2.0).
    pub holiday_weight: f64,
    /// Minimum hours between two shifts of one staff member (≥ 0, default 24).
    pub min_rest_hours: f64,
    /// Solver wall-clock budget in seconds (> 0, default 5).
    pub time_limit_secs: f64,
    /// Objective coefficient of the absolute fairness deviation (default 10).
    pub fairness_weight: i64,
    /// Objective coefficient of each back-to-back shift pair (default 1).
    pub consecutive_weight: i64,
    /// Fixed-point scale applied to weights and targets (default 100).
    pub fixed_point_scale: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weekend_weight: 1.5,
            holiday_weight: 2.0,
            min_rest_hours: 24.0,
            time_limit_secs: 5.0,
            fairness_weight: 10,
            consecutive_weight: 1,
            fixed_point_scale: 100,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the weekend multiplier.
    pub fn with_weekend_weight(mut self, weight: f64) -> Self {
        self.weekend_weight = weight;
        self
    }

    /// Sets the holiday multiplier.
    pub fn with_holiday_weight(mut self, weight: f64) -> Self {
        self.holiday_weight = weight;
        self
    }

    /// Sets the minimum rest window.
    pub fn with_min_rest_hours(mut self, hours: f64) -> Self {
        self.min_rest_hours = hours;
        self
    }

    /// Sets the solver time budget.
    pub fn with_time_limit_secs(mut self, secs: f64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Sets the objective coefficients (fairness : consecutive).
    pub fn with_objective_weights(mut self, fairness: i64, consecutive: i64) -> Self {
        self.fairness_weight = fairness;
        self.consecutive_weight = consecutive;
        self
    }

    /// Sets the fixed-point scale.
    pub fn with_fixed_point_scale(mut self, scale: i64) -> Self {
        self.fixed_point_scale = scale;
        self
    }

    /// Weighting multipliers as a standalone value.
    pub fn fairness_weights(&self) -> FairnessWeights {
        FairnessWeights {
            weekend: self.weekend_weight,
            holiday: self.holiday_weight,
        }
    }

    /// Solver time budget as a `Duration`.
    ///
    /// Budgets too large for a `Duration` saturate to `Duration::MAX`;
    /// negative or NaN budgets map to zero.
    pub fn time_limit(&self) -> Duration {
        match Duration::try_from_secs_f64(self.time_limit_secs) {
            Ok(limit) => limit,
            Err(_) if self.time_limit_secs > 0.0 => Duration::MAX,
            Err(_) => Duration::ZERO,
        }
    }

    /// Checks value ranges.
    ///
    /// # Returns
    /// `Ok(())` if all fields are in range, `Err(errors)` with every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let multiplier_ok = |value: f64| value.is_finite() && value >= 0.0;

        let non_negative = [
            ("weekend_weight", self.weekend_weight),
            ("holiday_weight", self.holiday_weight),
            ("min_rest_hours", self.min_rest_hours),
        ];
        for (name, value) in non_negative {
            if !multiplier_ok(value) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidConfig,
                    format!("{name} must be a finite value >= 0, got {value}"),
                ));
            }
        }

        if !self.time_limit_secs.is_finite()
            || self.time_limit_secs <= 0.0
            || Duration::try_from_secs_f64(self.time_limit_secs).is_err()
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidConfig,
                format!(
                    "time_limit_secs must be a finite value > 0 that fits a Duration, got {}",
                    self.time_limit_secs
                ),
            ));
        }

        if self.fairness_weight < 0 || self.consecutive_weight < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidConfig,
                format!(
                    "objective weights must be >= 0, got fairness={} consecutive={}",
                    self.fairness_weight, self.consecutive_weight
                ),
            ));
        }

        if self.fixed_point_scale <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidConfig,
                format!(
                    "fixed_point_scale must be > 0, got {}",
                    self.fixed_point_scale
                ),
            ));
        }

        if multiplier_ok(self.weekend_weight)
            && multiplier_ok(self.holiday_weight)
            && self.fixed_point_scale > 0
        {
            // A weekend holiday carries both multipliers.
            let heaviest = 1.0_f64
                .max(self.weekend_weight)
                .max(self.holiday_weight)
                .max(self.weekend_weight * self.holiday_weight);
            let fixed = heaviest * self.fixed_point_scale as f64;
            if fixed > MAX_FIXED_SHIFT_WEIGHT {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidConfig,
                    format!(
                        "heaviest shift weight {heaviest} at fixed_point_scale {} \
                         exceeds 2^53",
                        self.fixed_point_scale
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
}
