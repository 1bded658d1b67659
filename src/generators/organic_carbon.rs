//! SYNTHETIC ORGANIC CARBON
//!
//! Derives organic carbon (%) from nitrogen when the input has no OC reading:
//! `OC = 0.005 * N + Normal(0.2, 0.5)`, clamped to [0.3, 2.5]
//! (2.5% is the practical ceiling for Indian farmland).

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::data::{SoilDataset, COL_N, COL_OC};
use crate::error::{SfiError, SfiResult};

/// Organic carbon generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganicCarbonConfig {
    pub seed: u64,
    /// OC (%) per kg/ha of nitrogen
    pub n_coefficient: f64,
    pub noise_mean: f64,
    pub noise_std: f64,
    pub min: f64,
    pub max: f64,
    /// Replace an OC column already present in the input
    pub overwrite: bool,
}

impl Default for OrganicCarbonConfig {
    fn default() -> Self {
        Self {
            seed: 56,
            n_coefficient: 0.005,
            noise_mean: 0.2,
            noise_std: 0.5,
            min: 0.3,
            max: 2.5,
            overwrite: false,
        }
    }
}

impl OrganicCarbonConfig {
    pub fn validate(&self) -> SfiResult<()> {
        if !(self.min <= self.max) {
            return Err(SfiError::InvalidConfig(format!(
                "organic carbon bounds must satisfy min <= max, got [{}, {}]",
                self.min, self.max
            )));
        }
        self.noise()?;
        Ok(())
    }

    fn noise(&self) -> SfiResult<Normal<f64>> {
        Normal::new(self.noise_mean, self.noise_std).map_err(|e| {
            SfiError::InvalidConfig(format!(
                "organic carbon noise (mean {}, std {}): {}",
                self.noise_mean, self.noise_std, e
            ))
        })
    }
}

/// One OC value per nitrogen reading, in input order
pub fn generate_organic_carbon(nitrogen: &[f64], config: &OrganicCarbonConfig) -> SfiResult<Vec<f64>> {
    config.validate()?;
    let noise = config.noise()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    nitrogen
        .iter()
        .enumerate()
        .map(|(row, &n)| {
            if n.is_nan() {
                return Err(SfiError::NonFiniteValue {
                    column: COL_N.to_string(),
                    row,
                    value: n,
                });
            }
            let oc = config.n_coefficient * n + noise.sample(&mut rng);
            Ok(oc.clamp(config.min, config.max))
        })
        .collect()
}

/// Attach an `OC` column derived from `N`
///
/// An OC column supplied with the input is kept unless `config.overwrite` is set.
pub fn assign_organic_carbon(dataset: &SoilDataset, config: &OrganicCarbonConfig) -> SfiResult<SoilDataset> {
    if dataset.has_column(COL_OC) && !config.overwrite {
        tracing::info!("OC supplied with input, keeping it");
        config.validate()?;
        return Ok(dataset.clone());
    }

    let nitrogen = dataset.values(COL_N)?;
    let organic_carbon = generate_organic_carbon(&nitrogen, config)?;

    tracing::info!(
        "Assigned synthetic organic carbon to {} samples (seed {})",
        organic_carbon.len(),
        config.seed
    );

    dataset.with_values(COL_OC, organic_carbon)
}
