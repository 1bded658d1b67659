//! Synthetic attribute generators
//!
//! Fill in attributes the soil readings do not carry: field coordinates and
//! organic carbon. Both are seeded and deterministic.

pub mod geo;
pub mod organic_carbon;

pub use geo::{assign_coordinates, generate_coordinates, Coordinate, FieldBounds, GeoConfig, LongitudeGrid};
pub use organic_carbon::{assign_organic_carbon, generate_organic_carbon, OrganicCarbonConfig};
