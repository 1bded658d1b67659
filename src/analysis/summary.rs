//! Dataset summary
//!
//! The numbers behind the fertility map and analysis panels: SFI statistics,
//! fertility class shares, nutrient means, per-parameter correlation and
//! quadratic trend against SFI, and the extent of the sampled field.

use serde::{Deserialize, Serialize};

use super::statistics::{mean, median, pearson, quadratic_fit, sample_std};
use crate::data::{SoilDataset, COL_K, COL_LATITUDE, COL_LONGITUDE, COL_N, COL_OC, COL_P, COL_PH, COL_SFI};
use crate::error::{SfiError, SfiResult};

/// SFI bucket used for fertility zoning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FertilityClass {
    Low,
    LowMedium,
    MediumHigh,
    High,
}

impl FertilityClass {
    pub const ALL: [FertilityClass; 4] = [
        FertilityClass::Low,
        FertilityClass::LowMedium,
        FertilityClass::MediumHigh,
        FertilityClass::High,
    ];

    /// Bucket edges: [0, 40), [40, 60), [60, 80), [80, 100]
    pub fn from_sfi(sfi: f64) -> Self {
        if sfi < 40.0 {
            FertilityClass::Low
        } else if sfi < 60.0 {
            FertilityClass::LowMedium
        } else if sfi < 80.0 {
            FertilityClass::MediumHigh
        } else {
            FertilityClass::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FertilityClass::Low => "Low (0-40)",
            FertilityClass::LowMedium => "Low-Medium (40-60)",
            FertilityClass::MediumHigh => "Medium-High (60-80)",
            FertilityClass::High => "High (80-100)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SfiStatistics {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassShare {
    pub class: FertilityClass,
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientMeans {
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub oc: f64,
    pub ph: f64,
}

/// Relationship between one soil parameter and SFI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterTrend {
    pub parameter: String,
    pub label: String,
    /// Pearson correlation with SFI; `None` for a constant column
    pub correlation: Option<f64>,
    /// `[a, b, c]` of `SFI ≈ a·x² + b·x + c`
    pub quadratic: Option<[f64; 3]>,
}

/// Bounding box of the sample coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldExtent {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub n_samples: usize,
    pub sfi: SfiStatistics,
    pub classes: Vec<ClassShare>,
    pub nutrient_means: NutrientMeans,
    pub parameters: Vec<ParameterTrend>,
    pub field: Option<FieldExtent>,
}

/// Parameters plotted against SFI, with display labels
const PARAMETERS: [(&str, &str); 5] = [
    (COL_N, "Nitrogen (kg/ha)"),
    (COL_P, "Phosphorus (kg/ha)"),
    (COL_K, "Potassium (kg/ha)"),
    (COL_OC, "Organic Carbon (%)"),
    (COL_PH, "pH"),
];

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

/// Summarize a scored dataset
pub fn summarize(dataset: &SoilDataset) -> SfiResult<DatasetSummary> {
    dataset.require(&[COL_N, COL_P, COL_K, COL_OC, COL_PH, COL_SFI], "dataset summary")?;
    if dataset.is_empty() {
        return Err(SfiError::InsufficientData { needed: 1, found: 0 });
    }

    let sfi = dataset.values(COL_SFI)?;
    let n_samples = sfi.len();
    let (sfi_min, sfi_max) = min_max(&sfi);

    let classes = FertilityClass::ALL
        .iter()
        .map(|&class| {
            let count = sfi.iter().filter(|&&v| FertilityClass::from_sfi(v) == class).count();
            ClassShare {
                class,
                label: class.label().to_string(),
                count,
                percent: count as f64 / n_samples as f64 * 100.0,
            }
        })
        .collect();

    let mut parameters = Vec::with_capacity(PARAMETERS.len());
    let mut means = [0.0; 5];
    for (idx, (column, label)) in PARAMETERS.iter().enumerate() {
        let values = dataset.values(column)?;
        means[idx] = mean(&values);
        parameters.push(ParameterTrend {
            parameter: column.to_string(),
            label: label.to_string(),
            correlation: pearson(&values, &sfi),
            quadratic: quadratic_fit(&values, &sfi),
        });
    }

    let field = if dataset.has_column(COL_LATITUDE) && dataset.has_column(COL_LONGITUDE) {
        let (lat_min, lat_max) = min_max(&dataset.values(COL_LATITUDE)?);
        let (lon_min, lon_max) = min_max(&dataset.values(COL_LONGITUDE)?);
        Some(FieldExtent { lat_min, lat_max, lon_min, lon_max })
    } else {
        None
    };

    Ok(DatasetSummary {
        n_samples,
        sfi: SfiStatistics {
            mean: mean(&sfi),
            median: median(&sfi),
            std_dev: sample_std(&sfi),
            min: sfi_min,
            max: sfi_max,
        },
        classes,
        nutrient_means: NutrientMeans {
            n: means[0],
            p: means[1],
            k: means[2],
            oc: means[3],
            ph: means[4],
        },
        parameters,
        field,
    })
}
