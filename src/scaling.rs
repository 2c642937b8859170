//! Min-max scaling to `[0, 1]`.
//!
//! A column whose values are all equal has no range to scale by; every
//! entry becomes `0.0` and the column is reported as degenerate.

use crate::error::{Result, ResultExt as _};
use crate::table::complete_numeric_values;
use polars::prelude::*;

/// Expression scaling `column` by its own minimum and range, mapping a
/// zero range to `0.0`.
pub fn min_max_expr(column: &str) -> Expr {
    let min = col(column).min();
    let range = col(column).max() - col(column).min();
    when(range.clone().eq(lit(0.0)))
        .then(lit(0.0))
        .otherwise((col(column) - min) / range)
        .alias(column)
}

/// True when the column has at least one value and no spread.
fn is_flat(values: &[f64]) -> bool {
    values
        .split_first()
        .is_some_and(|(first, rest)| rest.iter().all(|v| v == first))
}

/// Scale each named column independently, in place.
///
/// # Errors
///
/// Fails if a column is absent or incomplete.
pub fn scale_columns(df: DataFrame, columns: &[String]) -> Result<(DataFrame, Vec<String>)> {
    let mut degenerate = Vec::new();
    let mut exprs = Vec::with_capacity(columns.len());

    for column in columns {
        let values = complete_numeric_values(&df, column)?;
        if is_flat(&values) {
            tracing::warn!("{column}: zero variance, scaled to all zeros");
            degenerate.push(column.clone());
        }
        exprs.push(min_max_expr(column));
    }

    let df = df
        .lazy()
        .with_columns(exprs)
        .collect()
        .context("Failed to scale columns")?;

    tracing::info!("Min-max scaled {} column(s)", columns.len());
    Ok((df, degenerate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaled(values: Vec<f64>) -> anyhow::Result<Vec<f64>> {
        let df = DataFrame::new(vec![Column::from(Series::new("x".into(), values))])?;
        let out = df.lazy().select([min_max_expr("x")]).collect()?;
        Ok(complete_numeric_values(&out, "x")?)
    }

    #[test]
    fn test_scales_to_unit_interval() -> anyhow::Result<()> {
        assert_eq!(scaled(vec![10.0, 20.0, 15.0, 30.0])?, vec![0.0, 0.5, 0.25, 1.0]);
        Ok(())
    }

    #[test]
    fn test_constant_column_becomes_zeros() -> anyhow::Result<()> {
        assert_eq!(scaled(vec![7.0, 7.0, 7.0])?, vec![0.0, 0.0, 0.0]);
        assert!(is_flat(&[7.0, 7.0, 7.0]));
        Ok(())
    }

    #[test]
    fn test_empty_column_is_not_degenerate() {
        assert!(!is_flat(&[]));
    }

    #[test]
    fn test_frame_columns_scaled_independently() -> anyhow::Result<()> {
        let df = DataFrame::new(vec![
            Column::from(Series::new("Age".into(), vec![20.0, 40.0])),
            Column::from(Series::new("DB".into(), vec![50.0, 50.0])),
        ])?;

        let (df, degenerate) = scale_columns(df, &["Age".to_owned(), "DB".to_owned()])?;

        assert_eq!(complete_numeric_values(&df, "Age")?, vec![0.0, 1.0]);
        assert_eq!(complete_numeric_values(&df, "DB")?, vec![0.0, 0.0]);
        assert_eq!(degenerate, vec!["DB".to_owned()]);
        Ok(())
    }
}
