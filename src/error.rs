//! Domain error type
//!
//! Scoring, generation and model code return `SfiError`; file loading and the
//! pipeline binary wrap these in `anyhow` with context.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by the SFI core
#[derive(Error, Debug)]
pub enum SfiError {
    #[error("{context}: missing required column(s) {columns:?}")]
    MissingColumns {
        context: String,
        columns: Vec<String>,
    },

    #[error("column '{column}' has a null value at row {row}")]
    NullValue { column: String, row: usize },

    #[error("column '{column}' has a non-finite value ({value}) at row {row}")]
    NonFiniteValue { column: String, row: usize, value: f64 },

    #[error("invalid nutrient range: low={low}, medium={medium}, high={high} (need 0 < low < medium < high)")]
    InvalidRange { low: f64, medium: f64, high: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("not enough samples: need at least {needed}, found {found}")]
    InsufficientData { needed: usize, found: usize },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type SfiResult<T> = std::result::Result<T, SfiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_names_every_column() {
        let err = SfiError::MissingColumns {
            context: "soil readings".to_string(),
            columns: vec!["N".to_string(), "ph".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("soil readings"));
        assert!(msg.contains("\"N\""));
        assert!(msg.contains("\"ph\""));
    }
}
