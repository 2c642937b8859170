use crate::error::{PrepError, Result, ResultExt as _};
use polars::prelude::*;

/// What imputation did to one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedColumn {
    pub column: String,
    pub filled: usize,
    pub median: f64,
}

/// Replace every missing entry of `column` with the median of its present
/// entries.
///
/// The median is taken once over the column as given, so the filled values
/// never feed back into it.
///
/// # Errors
///
/// Returns [`PrepError::AllMissing`] when no value is present.
pub fn impute_median(df: DataFrame, column: &str) -> Result<(DataFrame, ImputedColumn)> {
    let series = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let filled = series.null_count();
    let median = series.median().ok_or_else(|| PrepError::AllMissing {
        column: column.to_owned(),
    })?;

    let df = df
        .lazy()
        .with_column(
            col(column)
                .cast(DataType::Float64)
                .fill_null(lit(median))
                .alias(column),
        )
        .collect()
        .with_context(|| format!("Failed to impute {column}"))?;

    Ok((
        df,
        ImputedColumn {
            column: column.to_owned(),
            filled,
            median,
        },
    ))
}

/// Median-impute each named column of the table.
///
/// # Errors
///
/// Fails if a column is absent or entirely missing.
pub fn impute_medians(
    df: DataFrame,
    columns: &[String],
) -> Result<(DataFrame, Vec<ImputedColumn>)> {
    let mut df = df;
    let mut summary = Vec::with_capacity(columns.len());

    for column in columns {
        let (completed, imputed) = impute_median(df, column)?;

        if imputed.filled > 0 {
            tracing::info!(
                "{column}: filled {} missing value(s) with median {}",
                imputed.filled,
                imputed.median
            );
        } else {
            tracing::debug!("{column}: complete, median {}", imputed.median);
        }

        df = completed;
        summary.push(imputed);
    }

    Ok((df, summary))
}
