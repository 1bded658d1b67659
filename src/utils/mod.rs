//! Utility modules for SFI scoring
//!
//! Contains shared functionality used across scoring stages:
//! - Normalization: Piecewise-linear nutrient scoring
//! - Columns: DataFrame column validation and extraction

pub mod normalization;
pub mod columns;

// Re-export commonly used types
pub use normalization::{nutrient_score, NutrientRange};
pub use columns::{f64_values, has_column, require_columns, with_f64_column};
