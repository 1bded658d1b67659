//! SFI Scorer - combines sub-scores into the Soil Fertility Index
//!
//! SFI = 0.30·N + 0.25·P + 0.20·K + 0.15·OC + 0.10·pH (sub-scores 0-100),
//! rounded to 2 decimals. Each sample is scored independently.

use serde::{Deserialize, Serialize};

use crate::data::{SoilDataset, SoilSample, COL_K, COL_N, COL_OC, COL_P, COL_PH, COL_SFI};
use crate::error::{SfiError, SfiResult};
use crate::metrics::{ph_score, score_nutrients, NutrientRanges, NutrientScores, PhScoring};

/// Allowed drift of the weight total from 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weight of each sub-score in the composite index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SfiWeights {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub organic_carbon: f64,
    pub ph: f64,
}

impl Default for SfiWeights {
    fn default() -> Self {
        Self {
            nitrogen: 0.30,
            phosphorus: 0.25,
            potassium: 0.20,
            organic_carbon: 0.15,
            ph: 0.10,
        }
    }
}

impl SfiWeights {
    fn as_array(&self) -> [f64; 5] {
        [self.nitrogen, self.phosphorus, self.potassium, self.organic_carbon, self.ph]
    }

    pub fn validate(&self) -> SfiResult<()> {
        let weights = self.as_array();
        if weights.iter().any(|w| !(*w >= 0.0)) {
            return Err(SfiError::InvalidConfig(format!(
                "SFI weights must be non-negative, got {:?}",
                weights
            )));
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SfiError::InvalidConfig(format!(
                "SFI weights must sum to 1.0, got {}",
                total
            )));
        }
        Ok(())
    }
}

/// Everything the scorer needs: ranges, weights and pH parameters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub ranges: NutrientRanges,
    pub weights: SfiWeights,
    pub ph: PhScoring,
}

impl ScoringConfig {
    pub fn validate(&self) -> SfiResult<()> {
        self.ranges.validate()?;
        self.weights.validate()?;
        self.ph.validate()
    }
}

/// SFI with the sub-scores it was built from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SfiBreakdown {
    /// Composite index, 0-100, rounded to 2 decimals
    pub sfi: f64,
    pub nutrients: NutrientScores,
    pub ph: f64,
}

/// Main SFI scorer
#[derive(Debug, Clone, Default)]
pub struct SfiScorer {
    config: ScoringConfig,
}

impl SfiScorer {
    pub fn new(config: ScoringConfig) -> SfiResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one reading and keep the sub-scores
    pub fn breakdown(&self, n: f64, p: f64, k: f64, oc: f64, ph: f64) -> SfiBreakdown {
        let nutrients = score_nutrients(n, p, k, oc, &self.config.ranges);
        let ph_sub = ph_score(ph, &self.config.ph);
        let w = &self.config.weights;

        let sfi = w.nitrogen * nutrients.nitrogen
            + w.phosphorus * nutrients.phosphorus
            + w.potassium * nutrients.potassium
            + w.organic_carbon * nutrients.organic_carbon
            + w.ph * ph_sub;

        SfiBreakdown {
            sfi: round2(sfi),
            nutrients,
            ph: ph_sub,
        }
    }

    /// SFI of one reading
    pub fn compute(&self, n: f64, p: f64, k: f64, oc: f64, ph: f64) -> f64 {
        self.breakdown(n, p, k, oc, ph).sfi
    }

    /// Score a materialized sample; OC must already be assigned
    pub fn score_sample(&self, sample: &SoilSample) -> SfiResult<SfiBreakdown> {
        let oc = sample.oc.ok_or_else(|| SfiError::MissingColumns {
            context: "SFI scoring".to_string(),
            columns: vec![COL_OC.to_string()],
        })?;
        Ok(self.breakdown(sample.n, sample.p, sample.k, oc, sample.ph))
    }

    /// Attach an `SFI` column to the dataset
    ///
    /// Requires OC to exist: run the OC generator first when the input lacks it.
    pub fn score_dataset(&self, dataset: &SoilDataset) -> SfiResult<SoilDataset> {
        dataset.require(&[COL_N, COL_P, COL_K, COL_OC, COL_PH], "SFI scoring")?;

        let n = dataset.values(COL_N)?;
        let p = dataset.values(COL_P)?;
        let k = dataset.values(COL_K)?;
        let oc = dataset.values(COL_OC)?;
        let ph = dataset.values(COL_PH)?;

        let sfi: Vec<f64> = (0..dataset.len())
            .map(|i| self.compute(n[i], p[i], k[i], oc[i], ph[i]))
            .collect();

        tracing::debug!("Scored {} samples", sfi.len());

        dataset.with_values(COL_SFI, sfi)
    }
}

/// SFI of one reading with the default ranges, weights and pH optimum
pub fn compute_sfi(n: f64, p: f64, k: f64, oc: f64, ph: f64) -> f64 {
    SfiScorer::default().compute(n, p, k, oc, ph)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use polars::prelude::*;

    #[test]
    fn test_medium_boundary_sub_scores() {
        let b = SfiScorer::default().breakdown(400.0, 25.0, 250.0, 1.0, 6.5);
        assert_relative_eq!(b.ph, 100.0);
        assert_relative_eq!(b.nutrients.nitrogen, 75.0);
        assert_relative_eq!(b.nutrients.phosphorus, 75.0);
        assert_relative_eq!(b.nutrients.potassium, 75.0);
        assert_relative_eq!(b.nutrients.organic_carbon, 75.0);
        // 0.90 of weight at 75 plus 0.10 at 100
        assert_relative_eq!(b.sfi, 77.5);
    }

    #[test]
    fn test_only_ph_contributes_when_nutrients_absent() {
        assert_relative_eq!(compute_sfi(0.0, 0.0, 0.0, 0.0, 6.5), 10.0);
    }

    #[test]
    fn test_saturated_sample_scores_100() {
        assert_relative_eq!(compute_sfi(800.0, 80.0, 500.0, 3.0, 6.5), 100.0);
    }

    #[test]
    fn test_equals_weighted_sum_rounded() {
        let scorer = SfiScorer::default();
        let cases = [
            (123.0, 7.5, 310.0, 0.8, 5.2),
            (480.0, 42.0, 90.0, 1.6, 7.9),
            (650.0, 12.0, 180.0, 0.35, 4.1),
        ];

        for (n, p, k, oc, ph) in cases {
            let b = scorer.breakdown(n, p, k, oc, ph);
            let expected = 0.30 * b.nutrients.nitrogen
                + 0.25 * b.nutrients.phosphorus
                + 0.20 * b.nutrients.potassium
                + 0.15 * b.nutrients.organic_carbon
                + 0.10 * b.ph;
            assert!((b.sfi - expected).abs() <= 0.005 + 1e-9);
            assert!((0.0..=100.0).contains(&b.sfi));
        }
    }

    #[test]
    fn test_output_stays_in_range_for_hostile_inputs() {
        let scorer = SfiScorer::default();
        for (n, p, k, oc, ph) in [
            (-100.0, -5.0, -1.0, -0.2, 0.0),
            (1e9, 1e9, 1e9, 1e9, 14.0),
            (0.0, 0.0, 0.0, 0.0, 20.0),
        ] {
            let sfi = scorer.compute(n, p, k, oc, ph);
            assert!((0.0..=100.0).contains(&sfi), "SFI {} out of range", sfi);
        }
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let sfi = compute_sfi(123.0, 7.5, 310.0, 0.8, 5.2);
        assert_relative_eq!(sfi, (sfi * 100.0).round() / 100.0);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let config = ScoringConfig {
            weights: SfiWeights { ph: 0.2, ..SfiWeights::default() },
            ..ScoringConfig::default()
        };
        assert!(matches!(SfiScorer::new(config), Err(SfiError::InvalidConfig(_))));
    }

    #[test]
    fn test_score_sample_requires_oc() {
        let sample = SoilSample {
            n: 400.0,
            p: 25.0,
            k: 250.0,
            ph: 6.5,
            oc: None,
            latitude: None,
            longitude: None,
            sfi: None,
        };
        let scorer = SfiScorer::default();
        assert!(scorer.score_sample(&sample).is_err());

        let with_oc = SoilSample { oc: Some(1.0), ..sample };
        assert_relative_eq!(scorer.score_sample(&with_oc).unwrap().sfi, 77.5);
    }

    #[test]
    fn test_score_dataset_requires_oc_column() {
        let df = df![
            "N" => &[400.0],
            "P" => &[25.0],
            "K" => &[250.0],
            "ph" => &[6.5],
        ].unwrap();
        let dataset = SoilDataset::from_frame(df).unwrap();

        let err = SfiScorer::default().score_dataset(&dataset).unwrap_err();
        match err {
            SfiError::MissingColumns { columns, .. } => assert_eq!(columns, vec!["OC".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_score_dataset_attaches_sfi() {
        let df = df![
            "N" => &[400.0, 0.0],
            "P" => &[25.0, 0.0],
            "K" => &[250.0, 0.0],
            "OC" => &[1.0, 0.0],
            "ph" => &[6.5, 6.5],
        ].unwrap();
        let dataset = SoilDataset::from_frame(df).unwrap();

        let scored = SfiScorer::default().score_dataset(&dataset).unwrap();
        assert_eq!(scored.values(COL_SFI).unwrap(), vec![77.5, 10.0]);
        assert!(!dataset.has_column(COL_SFI));
    }
}
