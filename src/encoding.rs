//! Categorical encoders.
//!
//! - Ordinal: [`Education`] and [`StudyLoad`] carry a fixed, declared rank.
//! - One-hot: one boolean column per category for low-cardinality columns.
//! - Binary: the category's code spread over bit columns for wider ones.

use crate::error::{PrepError, Result};
use crate::schema;
use crate::table::complete_text_values;
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// Highest completed education, ranked 1 (lowest) to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Education {
    HighSchool,
    Diploma,
    Bachelors,
    Masters,
    Doctorate,
}

impl Education {
    pub const ALL: [Self; 5] = [
        Self::HighSchool,
        Self::Diploma,
        Self::Bachelors,
        Self::Masters,
        Self::Doctorate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::HighSchool => "High School",
            Self::Diploma => "Diploma",
            Self::Bachelors => "Bachelors",
            Self::Masters => "Masters",
            Self::Doctorate => "Doctorate",
        }
    }

    pub fn rank(self) -> i32 {
        match self {
            Self::HighSchool => 1,
            Self::Diploma => 2,
            Self::Bachelors => 3,
            Self::Masters => 4,
            Self::Doctorate => 5,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.label() == label)
    }

    pub fn from_rank(rank: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.rank() == rank)
    }
}

/// Weekly study load bucket, ranked 0 (Low) to 2 (High).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StudyLoad {
    Low,
    Medium,
    High,
}

impl StudyLoad {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Bucket a study-hours expression into labels: below `low_below` is
    /// Low, from `high_from` up is High, anything between is Medium.
    pub fn bucket_expr(hours: Expr, low_below: f64, high_from: f64) -> Expr {
        when(hours.clone().lt(lit(low_below)))
            .then(lit(Self::Low.label()))
            .when(hours.lt(lit(high_from)))
            .then(lit(Self::Medium.label()))
            .otherwise(lit(Self::High.label()))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn rank(self) -> i32 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    pub fn from_rank(rank: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.rank() == rank)
    }
}

/// Ordinal-encode the education column.
///
/// # Errors
///
/// Returns [`PrepError::InvalidCategory`] for any label outside the five
/// canonical levels, including nulls and values the normaliser passed
/// through unmapped.
pub fn encode_education(df: &DataFrame) -> Result<Series> {
    let ranks = complete_text_values(df, schema::PREV_EDUCATION)?
        .into_iter()
        .map(|label| {
            Education::from_label(&label)
                .map(Education::rank)
                .ok_or_else(|| PrepError::InvalidCategory {
                    column: schema::PREV_EDUCATION.to_owned(),
                    value: label,
                })
        })
        .collect::<Result<Vec<i32>>>()?;
    Ok(Series::new(schema::EDUCATION_LEVEL.into(), ranks))
}

/// Ordinal-encode the study-load column.
///
/// # Errors
///
/// Returns [`PrepError::InvalidCategory`] for an unknown label.
pub fn encode_study_load(df: &DataFrame) -> Result<Series> {
    let ranks = complete_text_values(df, schema::STUDYING_CATEGORY)?
        .into_iter()
        .map(|label| {
            StudyLoad::from_label(&label)
                .map(StudyLoad::rank)
                .ok_or_else(|| PrepError::InvalidCategory {
                    column: schema::STUDYING_CATEGORY.to_owned(),
                    value: label,
                })
        })
        .collect::<Result<Vec<i32>>>()?;
    Ok(Series::new(schema::STUDYING_CATEGORY_ENCODED.into(), ranks))
}

/// One boolean column per distinct category, named `<column>_<category>`,
/// categories in lexicographic order. Exactly one is true on every row.
///
/// # Errors
///
/// Fails if the column is absent or holds nulls.
pub fn one_hot_encode(df: &DataFrame, column: &str) -> Result<Vec<Expr>> {
    let values = complete_text_values(df, column)?;
    let categories: BTreeSet<&str> = values.iter().map(String::as_str).collect();

    Ok(categories
        .into_iter()
        .map(|category| {
            when(col(column).eq(lit(category)))
                .then(lit(true))
                .otherwise(lit(false))
                .alias(format!("{column}_{category}"))
        })
        .collect())
}

/// Number of bits needed to write `n` in binary (at least one).
fn bit_width(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()).max(1) as usize
}

/// Binary-encode a column: categories get codes 1..=n in order of first
/// appearance and each code is written as fixed-width bits, most significant
/// first, into `i32` columns `<column>_0 .. <column>_{w-1}`.
///
/// # Errors
///
/// Fails if the column is absent or holds nulls.
pub fn binary_encode(df: &DataFrame, column: &str) -> Result<Vec<Expr>> {
    let values = complete_text_values(df, column)?;

    let mut seen = HashSet::new();
    let order: Vec<&str> = values
        .iter()
        .map(String::as_str)
        .filter(|v| seen.insert(*v))
        .collect();

    let width = bit_width(order.len());
    tracing::debug!(
        "{column}: {} categories -> {width} binary column(s)",
        order.len()
    );

    Ok((0..width)
        .map(|bit| {
            let shift = width - 1 - bit;
            let set = order
                .iter()
                .enumerate()
                .filter(|(idx, _)| ((idx + 1) >> shift) & 1 == 1)
                .map(|(_, category)| col(column).eq(lit(*category)))
                .reduce(|acc, cond| acc.or(cond))
                .unwrap_or(lit(false));
            when(set)
                .then(lit(1i32))
                .otherwise(lit(0i32))
                .alias(format!("{column}_{bit}"))
        })
        .collect())
}
