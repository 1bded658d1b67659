//! Dataset pipeline
//!
//! load → coordinates → organic carbon → SFI → model → summary.
//! Every stage takes the dataset produced by the previous one and returns a
//! new, enriched dataset; nothing is mutated in place.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;

use crate::analysis::{summarize, DatasetSummary, FertilityReport};
use crate::config::PipelineConfig;
use crate::data::SoilDataset;
use crate::error::{SfiError, SfiResult};
use crate::generators::{assign_coordinates, assign_organic_carbon};
use crate::model::{train_model, ModelReport, TrainedModel, MIN_TRAINING_SAMPLES};
use crate::scorer::SfiScorer;

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Input plus `Latitude`, `Longitude`, `OC` and `SFI`
    pub dataset: SoilDataset,
    pub model: Option<TrainedModel>,
    pub summary: DatasetSummary,
}

impl PipelineOutput {
    pub fn model_report(&self) -> Option<&ModelReport> {
        self.model.as_ref().map(|m| &m.report)
    }

    pub fn report(&self) -> FertilityReport {
        FertilityReport::new(self.summary.clone(), self.model_report().cloned())
    }
}

pub struct Pipeline {
    config: PipelineConfig,
    scorer: SfiScorer,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> SfiResult<Self> {
        config.validate()?;
        let scorer = SfiScorer::new(config.scoring)?;
        Ok(Self { config, scorer })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage on an in-memory dataset
    ///
    /// An empty dataset is rejected before any stage runs.
    pub fn run(&self, dataset: &SoilDataset) -> SfiResult<PipelineOutput> {
        if dataset.is_empty() {
            return Err(SfiError::InsufficientData { needed: 1, found: 0 });
        }
        let start = Instant::now();
        tracing::info!("Running SFI pipeline on {} samples", dataset.len());

        let dataset = assign_coordinates(dataset, &self.config.geo)?;
        let dataset = assign_organic_carbon(&dataset, &self.config.organic_carbon)?;
        let dataset = self.scorer.score_dataset(&dataset)?;
        let model = self.fit_model(&dataset)?;
        let summary = summarize(&dataset)?;

        tracing::info!("Pipeline finished in {:.2?}", start.elapsed());

        Ok(PipelineOutput {
            dataset,
            model,
            summary,
        })
    }

    /// Load a CSV or Parquet file and run the pipeline on it
    pub fn run_from_path(&self, path: &Path) -> Result<PipelineOutput> {
        let dataset = SoilDataset::load(path)?;
        self.run(&dataset)
            .with_context(|| format!("SFI pipeline failed for {:?}", path))
    }

    fn fit_model(&self, dataset: &SoilDataset) -> SfiResult<Option<TrainedModel>> {
        if !self.config.model.enabled {
            tracing::info!("Model training disabled, skipping");
            return Ok(None);
        }
        if dataset.len() < MIN_TRAINING_SAMPLES {
            tracing::warn!(
                "Skipping model training: {} samples, need at least {}",
                dataset.len(),
                MIN_TRAINING_SAMPLES
            );
            return Ok(None);
        }
        train_model(dataset, &self.config.model).map(Some)
    }
}
