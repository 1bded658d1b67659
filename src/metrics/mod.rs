//! Sub-score modules for the Soil Fertility Index
//!
//! Each soil property is scored to 0-100 in its own module; the scorer
//! combines them with fixed weights.

pub mod nutrients;
pub mod soil_ph;

// Re-export sub-score functions
pub use nutrients::{score_nutrients, NutrientRanges, NutrientScores};
pub use soil_ph::{ph_score, PhScoring};
