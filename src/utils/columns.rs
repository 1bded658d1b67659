//! Column access helpers with validation
//!
//! Every stage reads its inputs through these helpers so a missing column
//! or a null reading fails fast with the column named, instead of surfacing
//! as a Polars lookup error deep inside a computation.

use polars::prelude::*;
use crate::error::{SfiError, SfiResult};

/// Check that every column in `columns` exists
///
/// Collects all missing names before failing so the error lists them together.
pub fn require_columns(df: &DataFrame, columns: &[&str], context: &str) -> SfiResult<()> {
    let missing: Vec<String> = columns
        .iter()
        .filter(|&&name| df.column(name).is_err())
        .map(|&name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SfiError::MissingColumns {
            context: context.to_string(),
            columns: missing,
        })
    }
}

/// True when the column exists
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Read a numeric column as `Vec<f64>`
///
/// Integer columns are cast to Float64. Nulls and NaN/infinite cells are
/// rejected with the row index.
pub fn f64_values(df: &DataFrame, name: &str) -> SfiResult<Vec<f64>> {
    let column = df.column(name).map_err(|_| SfiError::MissingColumns {
        context: format!("reading '{}'", name),
        columns: vec![name.to_string()],
    })?;

    let casted = column.cast(&DataType::Float64)?;
    let values = casted.f64()?;

    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(SfiError::NonFiniteValue {
                column: name.to_string(),
                row,
                value: v,
            }),
            None => Err(SfiError::NullValue {
                column: name.to_string(),
                row,
            }),
        })
        .collect()
}

/// Return a copy of `df` with `values` stored under `name`
///
/// Replaces an existing column of the same name.
pub fn with_f64_column(df: &DataFrame, name: &str, values: Vec<f64>) -> SfiResult<DataFrame> {
    let mut out = df.clone();
    out.with_column(Series::new(name.into(), values))?;
    Ok(out)
}
