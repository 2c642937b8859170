//! Fixed layout of the raw student-record extract.
//!
//! The extract has exactly eleven columns. Anything else (a missing column,
//! a renamed one, an extra one) aborts the run before any transformation.

use crate::error::{PrepError, Result};
use polars::prelude::*;
use std::collections::HashSet;

pub const FIRST_NAME: &str = "fNAME";
pub const LAST_NAME: &str = "lNAME";
pub const AGE: &str = "Age";
pub const GENDER: &str = "gender";
pub const COUNTRY: &str = "country";
pub const RESIDENCE: &str = "residence";
pub const ENTRY_EXAM: &str = "entryEXAM";
pub const PREV_EDUCATION: &str = "prevEducation";
pub const STUDY_HOURS: &str = "studyHOURS";
pub const PYTHON: &str = "Python";
pub const DB: &str = "DB";

/// Derived columns, created once by the feature stage.
pub const PROGRAMMING_AVERAGE: &str = "Programming Average";
pub const IS_ADULT: &str = "isAdult";
pub const STUDYING_CATEGORY: &str = "Studying Category";
pub const EDUCATION_LEVEL: &str = "Education_Level";
pub const STUDYING_CATEGORY_ENCODED: &str = "Studying_Category_Encoded";

/// Raw header in file order.
pub const RAW_COLUMNS: [&str; 11] = [
    FIRST_NAME,
    LAST_NAME,
    AGE,
    GENDER,
    COUNTRY,
    RESIDENCE,
    ENTRY_EXAM,
    PREV_EDUCATION,
    STUDY_HOURS,
    PYTHON,
    DB,
];

pub const TEXT_COLUMNS: [&str; 6] = [
    FIRST_NAME,
    LAST_NAME,
    GENDER,
    COUNTRY,
    RESIDENCE,
    PREV_EDUCATION,
];

pub const NUMERIC_COLUMNS: [&str; 5] = [AGE, ENTRY_EXAM, STUDY_HOURS, PYTHON, DB];

/// Check a header against [`RAW_COLUMNS`], ignoring order.
///
/// # Errors
///
/// Returns [`PrepError::Schema`] listing every missing and unexpected column.
pub fn validate_header<S: AsRef<str>>(header: &[S]) -> Result<()> {
    let expected: HashSet<&str> = RAW_COLUMNS.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut problems = Vec::new();

    for name in header {
        let name = name.as_ref();
        if !seen.insert(name) {
            problems.push(format!("duplicate column '{name}'"));
        } else if !expected.contains(name) {
            problems.push(format!("unexpected column '{name}'"));
        }
    }

    for name in RAW_COLUMNS {
        if !seen.contains(name) {
            problems.push(format!("missing column '{name}'"));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(PrepError::Schema(problems.join(", ")))
    }
}

/// Validate the frame's columns and put them in canonical order with
/// canonical types: text columns as strings, numeric columns as `Float64`.
///
/// # Errors
///
/// Fails on a header mismatch, or when a numeric column holds text that is
/// not a number.
pub fn conform(df: &DataFrame) -> Result<DataFrame> {
    let header: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    validate_header(&header)?;

    let mut columns = Vec::with_capacity(RAW_COLUMNS.len());
    for name in RAW_COLUMNS {
        let series = df.column(name)?.as_materialized_series();
        let typed = if NUMERIC_COLUMNS.contains(&name) {
            series.strict_cast(&DataType::Float64).map_err(|e| {
                PrepError::Schema(format!("column '{name}' is not numeric: {e}"))
            })?
        } else {
            series.cast(&DataType::String)?
        };
        columns.push(Column::from(typed));
    }

    Ok(DataFrame::new(columns)?)
}
