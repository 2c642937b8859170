use crate::error::{PrepError, Result};
use crate::table::{complete_numeric_values, numeric_values};
use polars::prelude::*;

const GRADE_MIN: f64 = 0.0;
const GRADE_MAX: f64 = 100.0;

/// Check the cleaned table before features are derived from it: imputed
/// columns carry no nulls and every grade lies on the 0 to 100 scale.
///
/// # Errors
///
/// Returns [`PrepError::MissingValues`] or [`PrepError::OutOfRange`] for the
/// first violation.
pub fn validate_cleaned(
    df: &DataFrame,
    complete_columns: &[String],
    grade_columns: &[String],
) -> Result<()> {
    for column in complete_columns {
        complete_numeric_values(df, column)?;
    }

    for column in grade_columns {
        for (row, value) in numeric_values(df, column)?.into_iter().enumerate() {
            if let Some(value) = value
                && !(GRADE_MIN..=GRADE_MAX).contains(&value)
            {
                return Err(PrepError::OutOfRange {
                    column: column.clone(),
                    row,
                    value,
                });
            }
        }
    }

    Ok(())
}
