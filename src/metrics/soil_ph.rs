//! pH SUB-SCORE
//!
//! Symmetric linear penalty around the agronomic optimum (6.5 by default):
//! every unit of deviation costs `penalty_per_unit` points, floored at 0.

use serde::{Deserialize, Serialize};
use crate::error::{SfiError, SfiResult};

/// pH scoring parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhScoring {
    pub optimum: f64,
    pub penalty_per_unit: f64,
}

impl Default for PhScoring {
    fn default() -> Self {
        Self {
            optimum: 6.5,
            penalty_per_unit: 15.0,
        }
    }
}

impl PhScoring {
    pub fn validate(&self) -> SfiResult<()> {
        if !self.optimum.is_finite() {
            return Err(SfiError::InvalidConfig(format!(
                "pH optimum must be finite, got {}",
                self.optimum
            )));
        }
        if !(self.penalty_per_unit >= 0.0 && self.penalty_per_unit.is_finite()) {
            return Err(SfiError::InvalidConfig(format!(
                "pH penalty must be a non-negative number, got {}",
                self.penalty_per_unit
            )));
        }
        Ok(())
    }
}

/// Score soil pH (0-100, 100 at the optimum)
///
/// No upper clamp: the deviation is non-negative so the score never exceeds 100.
/// A NaN reading scores 0.
pub fn ph_score(ph: f64, scoring: &PhScoring) -> f64 {
    if ph.is_nan() {
        return 0.0;
    }
    (100.0 - (ph - scoring.optimum).abs() * scoring.penalty_per_unit).max(0.0)
}
