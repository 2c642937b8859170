//! Derived columns, computed once from the cleaned table.
//!
//! | column | rule |
//! |---|---|
//! | `Programming Average` | mean of `Python` and `DB` |
//! | `isAdult` | `Age` at or above the adult threshold |
//! | `Studying Category` | Low / Medium / High bucket of `studyHOURS` |
//! | `Education_Level` | rank 1-5 of `prevEducation` |
//! | `Studying_Category_Encoded` | rank 0-2 of `Studying Category` |

use crate::config::FeatureConfig;
use crate::encoding::{StudyLoad, encode_education, encode_study_load};
use crate::error::{Result, ResultExt as _};
use crate::schema;
use crate::table::{complete_numeric_values, put_column};
use polars::prelude::*;

pub fn programming_average() -> Expr {
    ((col(schema::PYTHON) + col(schema::DB)) / lit(2.0)).alias(schema::PROGRAMMING_AVERAGE)
}

pub fn adult_flags(adult_age: f64) -> Expr {
    col(schema::AGE).gt_eq(lit(adult_age)).alias(schema::IS_ADULT)
}

pub fn study_loads(config: &FeatureConfig) -> Expr {
    StudyLoad::bucket_expr(
        col(schema::STUDY_HOURS),
        config.study_low_below,
        config.study_high_from,
    )
    .alias(schema::STUDYING_CATEGORY)
}

/// Append the five derived columns to the cleaned table.
///
/// # Errors
///
/// Fails if an input column is missing or incomplete, or if `prevEducation`
/// holds a label outside the five canonical levels.
pub fn derive_features(df: DataFrame, config: &FeatureConfig) -> Result<DataFrame> {
    for column in [schema::PYTHON, schema::DB, schema::AGE, schema::STUDY_HOURS] {
        complete_numeric_values(&df, column)?;
    }

    let mut df = df
        .lazy()
        .with_columns([
            programming_average(),
            adult_flags(config.adult_age),
            study_loads(config),
        ])
        .collect()
        .context("Failed to derive feature columns")?;

    let education = encode_education(&df)?;
    df = put_column(df, education)?;
    let study_load = encode_study_load(&df)?;
    df = put_column(df, study_load)?;

    tracing::info!("Derived 5 feature columns for {} rows", df.height());
    Ok(df)
}
