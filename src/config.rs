//! Pipeline configuration
//!
//! One JSON document with a section per stage. Every field has a default,
//! so `{}` (or no file at all) reproduces the standard run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SfiResult;
use crate::generators::{GeoConfig, OrganicCarbonConfig};
use crate::model::ModelConfig;
use crate::scorer::ScoringConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub geo: GeoConfig,
    pub organic_carbon: OrganicCarbonConfig,
    pub scoring: ScoringConfig,
    pub model: ModelConfig,
}

impl PipelineConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline config: {:?}", path))?;

        let config: PipelineConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse pipeline config JSON")?;

        config
            .validate()
            .with_context(|| format!("Invalid pipeline config: {:?}", path))?;

        Ok(config)
    }

    pub fn validate(&self) -> SfiResult<()> {
        self.geo.validate()?;
        self.organic_carbon.validate()?;
        self.scoring.validate()?;
        self.model.validate()?;
        Ok(())
    }
}
