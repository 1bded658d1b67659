//! Dataset analysis and reporting
//!
//! Summarizes a scored dataset (SFI statistics, fertility classes, nutrient
//! means, parameter trends) and renders the result with the model report
//! as JSON or Markdown.

pub mod formatters;
pub mod report;
pub mod statistics;
pub mod summary;

pub use formatters::{JsonFormatter, MarkdownFormatter};
pub use report::FertilityReport;
pub use summary::{
    summarize, ClassShare, DatasetSummary, FertilityClass, FieldExtent, NutrientMeans,
    ParameterTrend, SfiStatistics,
};
