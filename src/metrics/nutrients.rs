//! NUTRIENT SUB-SCORES (N, P, K, OC)
//!
//! Scores each macronutrient and organic carbon against its own threshold
//! range using the shared piecewise-linear normalization.
//!
//! **Default ranges** (ideal limits for production):
//!   1. N  - 200 / 400 / 600 kg/ha
//!   2. P  - 10 / 25 / 50 kg/ha
//!   3. K  - 100 / 250 / 400 kg/ha
//!   4. OC - 0.5 / 1.0 / 2.0 %

use serde::{Deserialize, Serialize};
use crate::error::SfiResult;
use crate::utils::{nutrient_score, NutrientRange};

/// Threshold ranges for the four scored nutrients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientRanges {
    pub nitrogen: NutrientRange,
    pub phosphorus: NutrientRange,
    pub potassium: NutrientRange,
    pub organic_carbon: NutrientRange,
}

impl Default for NutrientRanges {
    fn default() -> Self {
        Self {
            nitrogen: NutrientRange::NITROGEN,
            phosphorus: NutrientRange::PHOSPHORUS,
            potassium: NutrientRange::POTASSIUM,
            organic_carbon: NutrientRange::ORGANIC_CARBON,
        }
    }
}

impl NutrientRanges {
    pub fn validate(&self) -> SfiResult<()> {
        self.nitrogen.validate()?;
        self.phosphorus.validate()?;
        self.potassium.validate()?;
        self.organic_carbon.validate()
    }
}

/// Sub-scores (0-100) for the four nutrients of one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientScores {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub organic_carbon: f64,
}

/// Score N, P, K and OC of one sample
pub fn score_nutrients(n: f64, p: f64, k: f64, oc: f64, ranges: &NutrientRanges) -> NutrientScores {
    NutrientScores {
        nitrogen: nutrient_score(n, &ranges.nitrogen),
        phosphorus: nutrient_score(p, &ranges.phosphorus),
        potassium: nutrient_score(k, &ranges.potassium),
        organic_carbon: nutrient_score(oc, &ranges.organic_carbon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_medium_thresholds_score_75() {
        let scores = score_nutrients(400.0, 25.0, 250.0, 1.0, &NutrientRanges::default());
        assert_relative_eq!(scores.nitrogen, 75.0);
        assert_relative_eq!(scores.phosphorus, 75.0);
        assert_relative_eq!(scores.potassium, 75.0);
        assert_relative_eq!(scores.organic_carbon, 75.0);
    }

    #[test]
    fn test_each_nutrient_uses_its_own_range() {
        // 100 is the K low threshold but only halfway to the N low threshold
        let scores = score_nutrients(100.0, 100.0, 100.0, 100.0, &NutrientRanges::default());
        assert_relative_eq!(scores.nitrogen, 25.0);
        assert_relative_eq!(scores.phosphorus, 100.0);
        assert_relative_eq!(scores.potassium, 50.0);
        assert_relative_eq!(scores.organic_carbon, 100.0);
    }

    #[test]
    fn test_partial_ranges_fill_from_defaults() {
        let json = r#"{ "nitrogen": { "low": 100.0, "medium": 200.0, "high": 300.0 } }"#;
        let ranges: NutrientRanges = serde_json::from_str(json).unwrap();
        assert_eq!(ranges.phosphorus, NutrientRange::PHOSPHORUS);
        assert_relative_eq!(ranges.nitrogen.low(), 100.0);
        assert!(ranges.validate().is_ok());
    }
}
