//! Loading, saving and column access for the in-memory student table.
//!
//! The table is a Polars [`DataFrame`]. Stages pull a column out as plain
//! values, transform them, and write a new column back under a name.

use crate::error::{PrepError, Result, ResultExt as _};
use crate::schema;
use polars::prelude::*;
use std::path::Path;

/// Field separator for a delimited file, chosen by extension: `.csv` and
/// `.txt` are comma-separated, `.tsv` is tab-separated.
///
/// # Errors
///
/// Returns [`PrepError::Other`] for any other extension.
pub fn separator_for(path: &Path) -> Result<u8> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" | "txt" => Ok(b','),
        "tsv" => Ok(b'\t'),
        _ => Err(PrepError::Other(format!(
            "Unsupported file extension '{ext}': expected .csv, .tsv or .txt"
        ))),
    }
}

/// Read the raw extract and conform it to the student-record schema.
///
/// # Errors
///
/// Fails when the extension is not a known delimited format, when the file
/// cannot be read or parsed, or when its header does not match the expected
/// eleven columns.
pub fn load_table(path: &Path) -> Result<DataFrame> {
    let separator = separator_for(path)?;

    let df = LazyCsvReader::new(path)
        .with_separator(separator)
        .with_infer_schema_length(Some(10000))
        .with_has_header(true)
        .finish()?
        .collect()
        .with_context(|| format!("Failed to read {}", path.display()))?;

    tracing::info!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    schema::conform(&df)
}

/// Write the processed table as a headed delimited file, creating parent
/// directories as needed. The separator follows the extension as for
/// [`load_table`].
///
/// # Errors
///
/// Fails on an unknown extension or when the directory or file cannot be
/// created or written.
pub fn save_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let separator = separator_for(path)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(file)
        .include_header(true)
        .with_separator(separator)
        .finish(df)
        .context("Failed to write delimited file")?;

    tracing::info!(
        "Wrote {} rows x {} columns to {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(())
}

/// Numeric column as `f64` values, `None` where missing.
///
/// # Errors
///
/// Fails if the column is absent or cannot be cast to `Float64`.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// Numeric column that must be complete.
///
/// # Errors
///
/// Returns [`PrepError::MissingValues`] if any entry is null.
pub fn complete_numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = numeric_values(df, name)?;
    let missing = values.iter().filter(|v| v.is_none()).count();
    if missing > 0 {
        return Err(PrepError::MissingValues {
            column: name.to_owned(),
            count: missing,
        });
    }
    Ok(values.into_iter().flatten().collect())
}

/// Text column as owned strings, `None` where missing.
///
/// # Errors
///
/// Fails if the column is absent or cannot be cast to a string column.
pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect())
}

/// Text column that must be complete; a null is reported as an unrecognised
/// category because no vocabulary contains it.
///
/// # Errors
///
/// Returns [`PrepError::InvalidCategory`] on the first null.
pub fn complete_text_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    text_values(df, name)?
        .into_iter()
        .map(|v| {
            v.ok_or_else(|| PrepError::InvalidCategory {
                column: name.to_owned(),
                value: "<null>".to_owned(),
            })
        })
        .collect()
}

/// Add `series` to the frame, replacing any column with the same name.
///
/// # Errors
///
/// Fails if the series length does not match the frame height.
pub fn put_column(mut df: DataFrame, series: Series) -> Result<DataFrame> {
    df.with_column(series)?;
    Ok(df)
}
