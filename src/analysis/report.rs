use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::summary::DatasetSummary;
use crate::model::ModelReport;

/// Everything the pipeline reports about one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FertilityReport {
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub source: Option<String>,
    pub summary: DatasetSummary,
    pub model: Option<ModelReport>,
}

impl FertilityReport {
    pub fn new(summary: DatasetSummary, model: Option<ModelReport>) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            source: None,
            summary,
            model,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
