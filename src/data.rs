//! Data Loading and Management
//!
//! Holds the soil readings table as a Polars DataFrame and handles loading
//! (CSV or Parquet) and writing the enriched table back out as CSV.
//!
//! Required columns: `N`, `P`, `K`, `ph`. Optional: `OC`, `Latitude`,
//! `Longitude`, `SFI` (synthesized or derived by later stages).

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::error::SfiResult;
use crate::utils::{f64_values, has_column, require_columns, with_f64_column};

pub const COL_N: &str = "N";
pub const COL_P: &str = "P";
pub const COL_K: &str = "K";
pub const COL_OC: &str = "OC";
pub const COL_PH: &str = "ph";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";
pub const COL_SFI: &str = "SFI";

/// Columns every dataset must carry before any stage runs
pub const REQUIRED_COLUMNS: &[&str] = &[COL_N, COL_P, COL_K, COL_PH];

/// Optional inputs that later stages read as numbers when supplied
const OPTIONAL_INPUT_COLUMNS: &[&str] = &[COL_OC, COL_LATITUDE, COL_LONGITUDE];

/// One soil reading
///
/// OC, coordinates and SFI are `None` until the matching stage has run.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilSample {
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub ph: f64,
    pub oc: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sfi: Option<f64>,
}

/// Ordered soil readings sharing one schema
///
/// Stages never mutate a dataset; they return an enriched copy.
#[derive(Debug, Clone)]
pub struct SoilDataset {
    frame: DataFrame,
}

impl SoilDataset {
    /// Wrap a DataFrame, failing fast when a required column is missing or
    /// any reading is null, NaN or infinite
    pub fn from_frame(frame: DataFrame) -> SfiResult<Self> {
        require_columns(&frame, REQUIRED_COLUMNS, "soil readings")?;

        let supplied = OPTIONAL_INPUT_COLUMNS
            .iter()
            .filter(|&&name| has_column(&frame, name));
        for name in REQUIRED_COLUMNS.iter().chain(supplied) {
            f64_values(&frame, name)?;
        }

        Ok(Self { frame })
    }

    /// Load soil readings from CSV or Parquet (chosen by extension)
    pub fn load(path: &Path) -> Result<Self> {
        let is_parquet = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("parquet"));

        let frame = if is_parquet {
            Self::load_parquet(path)?
        } else {
            Self::load_csv(path)?
        };

        tracing::info!(
            "Loaded {} soil readings ({} columns) from {:?}",
            frame.height(),
            frame.width(),
            path
        );

        Self::from_frame(frame)
            .with_context(|| format!("Invalid soil readings file: {:?}", path))
    }

    /// Load soil readings from CSV with "NA" treated as null
    fn load_csv(path: &Path) -> Result<DataFrame> {
        let parse_options = CsvParseOptions::default()
            .with_null_values(Some(NullValues::AllColumnsSingle("NA".into())));

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_parse_options(parse_options)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
            .finish()
            .with_context(|| format!("Failed to load soil readings CSV: {:?}", path))
    }

    fn load_parquet(path: &Path) -> Result<DataFrame> {
        LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to scan parquet: {:?}", path))?
            .collect()
            .with_context(|| format!("Failed to load soil readings parquet: {:?}", path))
    }

    /// Write the table (with any synthesized and derived columns) as CSV
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {:?}", path))?;
        let mut frame = self.frame.clone();

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)
            .with_context(|| format!("Failed to write CSV: {:?}", path))?;

        tracing::info!("Wrote {} rows to {:?}", frame.height(), path);
        Ok(())
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        has_column(&self.frame, name)
    }

    /// Fail with every missing name when any of `columns` is absent
    pub fn require(&self, columns: &[&str], context: &str) -> SfiResult<()> {
        require_columns(&self.frame, columns, context)
    }

    /// Numeric column values (integers cast to float, nulls rejected)
    pub fn values(&self, name: &str) -> SfiResult<Vec<f64>> {
        f64_values(&self.frame, name)
    }

    /// New dataset with `values` stored under `name`
    pub fn with_values(&self, name: &str, values: Vec<f64>) -> SfiResult<Self> {
        Ok(Self {
            frame: with_f64_column(&self.frame, name, values)?,
        })
    }

    /// Materialize rows as `SoilSample`s
    pub fn samples(&self) -> SfiResult<Vec<SoilSample>> {
        let n = self.values(COL_N)?;
        let p = self.values(COL_P)?;
        let k = self.values(COL_K)?;
        let ph = self.values(COL_PH)?;
        let oc = self.optional_values(COL_OC)?;
        let latitude = self.optional_values(COL_LATITUDE)?;
        let longitude = self.optional_values(COL_LONGITUDE)?;
        let sfi = self.optional_values(COL_SFI)?;

        let at = |column: &Option<Vec<f64>>, idx: usize| column.as_ref().map(|values| values[idx]);

        Ok((0..self.len())
            .map(|idx| SoilSample {
                n: n[idx],
                p: p[idx],
                k: k[idx],
                ph: ph[idx],
                oc: at(&oc, idx),
                latitude: at(&latitude, idx),
                longitude: at(&longitude, idx),
                sfi: at(&sfi, idx),
            })
            .collect())
    }

    fn optional_values(&self, name: &str) -> SfiResult<Option<Vec<f64>>> {
        if self.has_column(name) {
            Ok(Some(self.values(name)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SfiError;

    fn readings() -> DataFrame {
        df![
            "N" => &[120i64, 450, 610],
            "P" => &[8.0, 30.0, 55.0],
            "K" => &[90.0, 260.0, 420.0],
            "ph" => &[5.8, 6.5, 7.9],
        ].unwrap()
    }

    #[test]
    fn test_from_frame_accepts_required_columns() {
        let dataset = SoilDataset::from_frame(readings()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(!dataset.has_column(COL_OC));
    }

    #[test]
    fn test_from_frame_names_missing_columns() {
        let df = df![
            "N" => &[1.0],
            "P" => &[1.0],
        ].unwrap();

        let err = SoilDataset::from_frame(df).unwrap_err();
        match err {
            SfiError::MissingColumns { columns, .. } => {
                assert_eq!(columns, vec!["K".to_string(), "ph".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_samples_reflect_optional_columns() {
        let dataset = SoilDataset::from_frame(readings()).unwrap();
        let samples = dataset.samples().unwrap();
        assert_eq!(samples[0].n, 120.0);
        assert_eq!(samples[1].ph, 6.5);
        assert!(samples.iter().all(|s| s.oc.is_none() && s.sfi.is_none()));

        let with_oc = dataset.with_values(COL_OC, vec![0.4, 1.1, 2.2]).unwrap();
        let samples = with_oc.samples().unwrap();
        assert_eq!(samples[2].oc, Some(2.2));
        assert!(!dataset.has_column(COL_OC));
    }

    #[test]
    fn test_from_frame_rejects_nan_reading() {
        let df = df![
            "N" => &[f64::NAN, 400.0],
            "P" => &[25.0, 25.0],
            "K" => &[250.0, 250.0],
            "ph" => &[6.5, 6.5],
        ].unwrap();

        match SoilDataset::from_frame(df).unwrap_err() {
            SfiError::NonFiniteValue { column, row, .. } => {
                assert_eq!(column, "N");
                assert_eq!(row, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_frame_rejects_infinite_supplied_oc() {
        let df = df![
            "N" => &[400.0],
            "P" => &[25.0],
            "K" => &[250.0],
            "OC" => &[f64::INFINITY],
            "ph" => &[6.5],
        ].unwrap();

        assert!(matches!(
            SoilDataset::from_frame(df),
            Err(SfiError::NonFiniteValue { row: 0, .. })
        ));
    }

    #[test]
    #[ignore] // Requires data/Soil_readings.csv to be present
    fn test_load_default_readings() {
        let dataset = SoilDataset::load(Path::new("data/Soil_readings.csv"))
            .expect("Failed to load data");
        assert!(dataset.len() > 0);
    }
}
