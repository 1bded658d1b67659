//! Normalization Utilities
//!
//! Converts raw nutrient readings (kg/ha, %) to 0-100 sub-scores using
//! piecewise-linear zones bounded by low/medium/high thresholds.
//!
//! Zones:
//! - below `low`: very low zone, ramps 0 → 50
//! - `low..medium`: medium zone, ramps 50 → 75
//! - `medium..high`: high zone, ramps 75 → 100
//! - at or above `high`: saturated at 100

use serde::{Deserialize, Serialize};
use crate::error::{SfiError, SfiResult};

/// Sub-score reached at the `low` threshold
const LOW_ANCHOR: f64 = 50.0;
/// Sub-score reached at the `medium` threshold
const MEDIUM_ANCHOR: f64 = 75.0;
/// Sub-score reached at the `high` threshold
const HIGH_ANCHOR: f64 = 100.0;

/// Per-nutrient thresholds defining the scoring zones
///
/// Always satisfies `0 < low < medium < high` when built through
/// [`NutrientRange::new`] or deserialized and then validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientRange {
    low: f64,
    medium: f64,
    high: f64,
}

impl NutrientRange {
    /// Nitrogen (kg/ha)
    pub const NITROGEN: NutrientRange = NutrientRange { low: 200.0, medium: 400.0, high: 600.0 };
    /// Phosphorus (kg/ha)
    pub const PHOSPHORUS: NutrientRange = NutrientRange { low: 10.0, medium: 25.0, high: 50.0 };
    /// Potassium (kg/ha)
    pub const POTASSIUM: NutrientRange = NutrientRange { low: 100.0, medium: 250.0, high: 400.0 };
    /// Organic carbon (%)
    pub const ORGANIC_CARBON: NutrientRange = NutrientRange { low: 0.5, medium: 1.0, high: 2.0 };

    /// Build a range, rejecting thresholds that are not strictly increasing
    /// or a non-positive `low` (the very-low ramp divides by it).
    pub fn new(low: f64, medium: f64, high: f64) -> SfiResult<Self> {
        let range = Self { low, medium, high };
        range.validate()?;
        Ok(range)
    }

    /// Check the zone invariant (used after deserialization)
    pub fn validate(&self) -> SfiResult<()> {
        let ordered = self.low > 0.0 && self.low < self.medium && self.medium < self.high;
        if !ordered || !self.high.is_finite() {
            return Err(SfiError::InvalidRange {
                low: self.low,
                medium: self.medium,
                high: self.high,
            });
        }
        Ok(())
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn medium(&self) -> f64 {
        self.medium
    }

    pub fn high(&self) -> f64 {
        self.high
    }
}

/// Score a single nutrient reading against its range
///
/// Output is clamped to [0, 100] whatever the branch, so negative readings
/// score 0 rather than being rejected. NaN also scores 0.
pub fn nutrient_score(value: f64, range: &NutrientRange) -> f64 {
    if !(value > 0.0) {
        return 0.0;
    }

    let score = if value < range.low {
        value / range.low * LOW_ANCHOR
    } else if value < range.medium {
        let fraction = (value - range.low) / (range.medium - range.low);
        LOW_ANCHOR + fraction * (MEDIUM_ANCHOR - LOW_ANCHOR)
    } else if value < range.high {
        let fraction = (value - range.medium) / (range.high - range.medium);
        MEDIUM_ANCHOR + fraction * (HIGH_ANCHOR - MEDIUM_ANCHOR)
    } else {
        HIGH_ANCHOR
    };

    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zone_anchors() {
        let n = NutrientRange::NITROGEN;
        assert_relative_eq!(nutrient_score(0.0, &n), 0.0);
        assert_relative_eq!(nutrient_score(200.0, &n), 50.0);
        assert_relative_eq!(nutrient_score(400.0, &n), 75.0);
        assert_relative_eq!(nutrient_score(600.0, &n), 100.0);
    }

    #[test]
    fn test_ramps_are_linear_within_zones() {
        let p = NutrientRange::PHOSPHORUS;
        assert_relative_eq!(nutrient_score(5.0, &p), 25.0, epsilon = 1e-9);
        assert_relative_eq!(nutrient_score(17.5, &p), 62.5, epsilon = 1e-9);
        assert_relative_eq!(nutrient_score(37.5, &p), 87.5, epsilon = 1e-9);
    }

    #[test]
    fn test_non_positive_values_score_zero() {
        let k = NutrientRange::POTASSIUM;
        for value in [0.0, -0.001, -50.0, -1e9] {
            assert_eq!(nutrient_score(value, &k), 0.0);
        }
    }

    #[test]
    fn test_nan_scores_zero_not_saturated() {
        assert_eq!(nutrient_score(f64::NAN, &NutrientRange::NITROGEN), 0.0);
        assert_eq!(nutrient_score(f64::NEG_INFINITY, &NutrientRange::NITROGEN), 0.0);
        assert_eq!(nutrient_score(f64::INFINITY, &NutrientRange::NITROGEN), 100.0);
    }

    #[test]
    fn test_saturation_at_or_above_high() {
        let oc = NutrientRange::ORGANIC_CARBON;
        for value in [2.0, 2.0001, 5.0, 1e6] {
            assert_eq!(nutrient_score(value, &oc), 100.0);
        }
    }

    #[test]
    fn test_continuity_at_boundaries() {
        let ranges = [
            NutrientRange::NITROGEN,
            NutrientRange::PHOSPHORUS,
            NutrientRange::POTASSIUM,
            NutrientRange::ORGANIC_CARBON,
        ];
        let eps = 1e-9;

        for range in &ranges {
            for (threshold, anchor) in [(range.low(), 50.0), (range.medium(), 75.0), (range.high(), 100.0)] {
                let below = nutrient_score(threshold - eps, range);
                let above = nutrient_score(threshold + eps, range);
                assert_relative_eq!(below, anchor, epsilon = 1e-4);
                assert_relative_eq!(above, anchor, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        assert!(NutrientRange::new(0.0, 1.0, 2.0).is_err());
        assert!(NutrientRange::new(-1.0, 1.0, 2.0).is_err());
        assert!(NutrientRange::new(1.0, 1.0, 2.0).is_err());
        assert!(NutrientRange::new(1.0, 3.0, 2.0).is_err());
        assert!(NutrientRange::new(1.0, 2.0, f64::INFINITY).is_err());
        assert!(NutrientRange::new(0.5, 1.0, 2.0).is_ok());
    }

    #[test]
    fn test_deserialized_range_validates() {
        let json = r#"{ "low": 10.0, "medium": 5.0, "high": 50.0 }"#;
        let range: NutrientRange = serde_json::from_str(json).unwrap();
        assert!(range.validate().is_err());
    }
}
