//! SYNTHETIC FIELD COORDINATES
//!
//! Places samples on a jittered square grid inside a bounding square centred
//! on a fixed field anchor (IIT Kharagpur campus by default).
//!
//! Algorithm:
//! 1. `lat_range = field_size / meters_per_degree / 2`; the longitude range is
//!    widened by `1 / cos(center_lat)` for meridian convergence
//! 2. `grid_size = floor(sqrt(n))`; sample `i` takes cell `(i / grid_size, i % grid_size)`
//! 3. Each grid coordinate gets Gaussian jitter with std `range / grid_size / 3`
//!    (~99.7% of draws stay within one cell)
//! 4. Samples past `grid_size²` are placed uniformly in the whole bounding box
//!
//! The same seed and sample count always give the same coordinates.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::data::{SoilDataset, COL_LATITUDE, COL_LONGITUDE};
use crate::error::{SfiError, SfiResult};

/// Which centre/range the longitude grid axis is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongitudeGrid {
    /// Longitude centre and longitude range
    #[default]
    Longitude,
    /// Latitude centre and latitude range, reproducing the legacy field layout
    LatitudeMirror,
}

/// Synthetic field parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    pub seed: u64,
    pub field_size_m: f64,
    pub center_lat: f64,
    pub center_lon: f64,
    pub meters_per_degree: f64,
    pub longitude_grid: LongitudeGrid,
    /// Replace coordinates already present in the input
    pub overwrite: bool,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            seed: 35,
            field_size_m: 1000.0,
            // 22°18'57.6"N 87°18'31.0"E
            center_lat: 22.18576,
            center_lon: 87.1831,
            meters_per_degree: 111_000.0,
            longitude_grid: LongitudeGrid::Longitude,
            overwrite: false,
        }
    }
}

impl GeoConfig {
    pub fn validate(&self) -> SfiResult<()> {
        if !(self.field_size_m > 0.0 && self.field_size_m.is_finite()) {
            return Err(SfiError::InvalidConfig(format!(
                "field_size_m must be positive, got {}",
                self.field_size_m
            )));
        }
        if !(self.meters_per_degree > 0.0 && self.meters_per_degree.is_finite()) {
            return Err(SfiError::InvalidConfig(format!(
                "meters_per_degree must be positive, got {}",
                self.meters_per_degree
            )));
        }
        if !(self.center_lat.abs() < 90.0) {
            return Err(SfiError::InvalidConfig(format!(
                "center_lat must lie strictly between -90 and 90, got {}",
                self.center_lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.center_lon) {
            return Err(SfiError::InvalidConfig(format!(
                "center_lon must lie within [-180, 180], got {}",
                self.center_lon
            )));
        }
        Ok(())
    }

    /// Bounding square of the synthetic field
    pub fn bounds(&self) -> FieldBounds {
        let lat_range = (self.field_size_m / self.meters_per_degree) / 2.0;
        let lon_range = (self.field_size_m
            / (self.meters_per_degree * self.center_lat.to_radians().cos()))
            / 2.0;

        FieldBounds {
            center_lat: self.center_lat,
            center_lon: self.center_lon,
            lat_range,
            lon_range,
        }
    }
}

/// Field centre and half-ranges in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub center_lat: f64,
    pub center_lon: f64,
    pub lat_range: f64,
    pub lon_range: f64,
}

impl FieldBounds {
    pub fn lat_min(&self) -> f64 {
        self.center_lat - self.lat_range
    }

    pub fn lat_max(&self) -> f64 {
        self.center_lat + self.lat_range
    }

    pub fn lon_min(&self) -> f64 {
        self.center_lon - self.lon_range
    }

    pub fn lon_max(&self) -> f64 {
        self.center_lon + self.lon_range
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lat_min()..=self.lat_max()).contains(&latitude)
            && (self.lon_min()..=self.lon_max()).contains(&longitude)
    }
}

/// A generated (latitude, longitude) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// `num` evenly spaced values over `[start, end]`, both ends included
fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
            values[num - 1] = end;
            values
        }
    }
}

/// Generate coordinates for `n_samples` samples
pub fn generate_coordinates(n_samples: usize, config: &GeoConfig) -> SfiResult<Vec<Coordinate>> {
    config.validate()?;

    if n_samples == 0 {
        return Ok(Vec::new());
    }

    let bounds = config.bounds();
    let grid_size = (n_samples as f64).sqrt().floor() as usize;

    let lat_grid = linspace(bounds.lat_min(), bounds.lat_max(), grid_size);
    let lon_grid = match config.longitude_grid {
        LongitudeGrid::Longitude => linspace(bounds.lon_min(), bounds.lon_max(), grid_size),
        LongitudeGrid::LatitudeMirror => linspace(bounds.lat_min(), bounds.lat_max(), grid_size),
    };

    let invalid_noise = |e: rand_distr::NormalError| {
        SfiError::InvalidConfig(format!("coordinate jitter: {}", e))
    };
    let lat_jitter = Normal::new(0.0, bounds.lat_range / grid_size as f64 / 3.0)
        .map_err(invalid_noise)?;
    let lon_jitter = Normal::new(0.0, bounds.lon_range / grid_size as f64 / 3.0)
        .map_err(invalid_noise)?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut coordinates = Vec::with_capacity(n_samples);

    for i in 0..n_samples {
        let grid_i = i / grid_size;
        let grid_j = i % grid_size;

        let coordinate = if grid_i < lat_grid.len() && grid_j < lon_grid.len() {
            let latitude = lat_grid[grid_i] + lat_jitter.sample(&mut rng);
            let longitude = lon_grid[grid_j] + lon_jitter.sample(&mut rng);
            Coordinate { latitude, longitude }
        } else {
            // Remainder past the perfect square: anywhere in the field
            let latitude = rng.gen_range(bounds.lat_min()..=bounds.lat_max());
            let longitude = rng.gen_range(bounds.lon_min()..=bounds.lon_max());
            Coordinate { latitude, longitude }
        };

        coordinates.push(coordinate);
    }

    Ok(coordinates)
}

/// Attach `Latitude`/`Longitude` columns to the dataset
///
/// Coordinates supplied with the input are kept unless `config.overwrite` is set.
pub fn assign_coordinates(dataset: &SoilDataset, config: &GeoConfig) -> SfiResult<SoilDataset> {
    let supplied = dataset.has_column(COL_LATITUDE) && dataset.has_column(COL_LONGITUDE);
    if supplied && !config.overwrite {
        tracing::info!("Latitude/Longitude supplied with input, keeping them");
        config.validate()?;
        return Ok(dataset.clone());
    }

    let coordinates = generate_coordinates(dataset.len(), config)?;
    let (latitudes, longitudes): (Vec<f64>, Vec<f64>) = coordinates
        .iter()
        .map(|c| (c.latitude, c.longitude))
        .unzip();

    tracing::info!(
        "Assigned synthetic coordinates to {} samples ({} m field, seed {})",
        dataset.len(),
        config.field_size_m,
        config.seed
    );

    dataset
        .with_values(COL_LATITUDE, latitudes)?
        .with_values(COL_LONGITUDE, longitudes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_follow_field_size() {
        let bounds = GeoConfig::default().bounds();
        assert_relative_eq!(bounds.lat_range, 1000.0 / 111_000.0 / 2.0, epsilon = 1e-12);
        // Longitude degrees are shorter away from the equator, so the range is wider
        assert!(bounds.lon_range > bounds.lat_range);
        assert_relative_eq!(
            bounds.lon_range,
            bounds.lat_range / 22.18576_f64.to_radians().cos(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_linspace_matches_endpoints() {
        assert_eq!(linspace(0.0, 1.0, 0), Vec::<f64>::new());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_same_seed_same_coordinates() {
        let config = GeoConfig::default();
        let first = generate_coordinates(50, &config).unwrap();
        let second = generate_coordinates(50, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seed_different_coordinates() {
        let first = generate_coordinates(16, &GeoConfig::default()).unwrap();
        let other = GeoConfig { seed: 36, ..GeoConfig::default() };
        let second = generate_coordinates(16, &other).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_remainder_samples_stay_inside_field() {
        // 30 samples: 5x5 grid plus 5 uniformly placed remainder samples
        let config = GeoConfig::default();
        let bounds = config.bounds();
        let coordinates = generate_coordinates(30, &config).unwrap();

        assert_eq!(coordinates.len(), 30);
        for c in &coordinates[25..] {
            assert!(bounds.contains(c.latitude, c.longitude), "{:?} outside field", c);
        }
    }

    #[test]
    fn test_grid_samples_stay_near_their_cell() {
        let config = GeoConfig::default();
        let bounds = config.bounds();
        let coordinates = generate_coordinates(100, &config).unwrap();

        // Jitter std is range/grid/3; allow a generous 10 std margin
        let lat_margin = bounds.lat_range / 10.0 / 3.0 * 10.0;
        let lon_margin = bounds.lon_range / 10.0 / 3.0 * 10.0;
        for c in &coordinates {
            assert!(c.latitude >= bounds.lat_min() - lat_margin && c.latitude <= bounds.lat_max() + lat_margin);
            assert!(c.longitude >= bounds.lon_min() - lon_margin && c.longitude <= bounds.lon_max() + lon_margin);
        }

        // Row-major layout: latitude rises with the row index
        let row_mean = |row: usize| -> f64 {
            coordinates[row * 10..(row + 1) * 10].iter().map(|c| c.latitude).sum::<f64>() / 10.0
        };
        assert!(row_mean(0) < row_mean(9));
    }

    #[test]
    fn test_latitude_mirror_places_longitudes_near_latitude_centre() {
        let config = GeoConfig {
            longitude_grid: LongitudeGrid::LatitudeMirror,
            ..GeoConfig::default()
        };
        let coordinates = generate_coordinates(16, &config).unwrap();
        for c in &coordinates {
            assert!((c.longitude - config.center_lat).abs() < 0.1);
        }
    }

    #[test]
    fn test_empty_and_single_sample() {
        let config = GeoConfig::default();
        assert!(generate_coordinates(0, &config).unwrap().is_empty());

        let single = generate_coordinates(1, &config).unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_assign_keeps_supplied_coordinates() {
        use polars::prelude::*;

        let df = df![
            "N" => &[300.0, 500.0],
            "P" => &[20.0, 40.0],
            "K" => &[200.0, 300.0],
            "ph" => &[6.5, 7.0],
            "Latitude" => &[22.3, 22.4],
            "Longitude" => &[87.3, 87.4],
        ].unwrap();
        let dataset = SoilDataset::from_frame(df).unwrap();

        let kept = assign_coordinates(&dataset, &GeoConfig::default()).unwrap();
        assert_eq!(kept.values(COL_LATITUDE).unwrap(), vec![22.3, 22.4]);

        let config = GeoConfig { overwrite: true, ..GeoConfig::default() };
        let replaced = assign_coordinates(&dataset, &config).unwrap();
        let expected = generate_coordinates(2, &config).unwrap();
        let lat = replaced.values(COL_LATITUDE).unwrap();
        let lon = replaced.values(COL_LONGITUDE).unwrap();
        assert_eq!(lat, expected.iter().map(|c| c.latitude).collect::<Vec<_>>());
        assert_eq!(lon, expected.iter().map(|c| c.longitude).collect::<Vec<_>>());
    }

    #[test]
    fn test_invalid_field_size_rejected() {
        let config = GeoConfig { field_size_m: 0.0, ..GeoConfig::default() };
        assert!(matches!(
            generate_coordinates(4, &config),
            Err(SfiError::InvalidConfig(_))
        ));
    }
}
