//! Soil Fertility Index scorer
//!
//! Scores soil readings (N, P, K, organic carbon, pH) into a 0-100 Soil
//! Fertility Index and analyses the scored field:
//! - `utils/`: Piecewise-linear nutrient normalization and column helpers
//! - `data`: Dataset loading with Polars
//! - `metrics/`: Nutrient and pH sub-scores
//! - `scorer`: Weighted SFI composite
//! - `generators/`: Seeded synthetic coordinates and organic carbon
//! - `model/`: Random Forest relating nutrients to SFI
//! - `analysis/`: Dataset summary and JSON/Markdown reports
//! - `pipeline`: Stage orchestration

pub mod error;
pub mod utils;
pub mod data;
pub mod metrics;
pub mod scorer;
pub mod generators;
pub mod model;
pub mod analysis;
pub mod config;
pub mod pipeline;

// Re-export commonly used types
pub use error::{SfiError, SfiResult};
pub use utils::{nutrient_score, NutrientRange};
pub use data::{SoilDataset, SoilSample};
pub use metrics::*;
pub use scorer::{compute_sfi, ScoringConfig, SfiBreakdown, SfiScorer, SfiWeights};
pub use generators::{assign_coordinates, assign_organic_carbon, GeoConfig, LongitudeGrid, OrganicCarbonConfig};
pub use model::{train_model, ModelConfig, ModelReport, TrainedModel};
pub use analysis::{summarize, DatasetSummary, FertilityClass, FertilityReport, JsonFormatter, MarkdownFormatter};
pub use config::PipelineConfig;
pub use pipeline::{Pipeline, PipelineOutput};
