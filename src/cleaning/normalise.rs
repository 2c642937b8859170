use crate::config::{CategoryMap, Vocabularies};
use crate::error::{Result, ResultExt as _};
use crate::schema;
use crate::table::{put_column, text_values};
use polars::prelude::*;
use std::collections::BTreeMap;

/// A raw value that no mapping recognised, kept as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedValue {
    pub column: String,
    pub value: String,
    pub occurrences: usize,
}

/// Trim, case-fold and look up each value. Unknown values pass through
/// untouched and are returned with their occurrence counts; nulls stay null.
pub fn normalise_column(
    values: &[Option<String>],
    map: &CategoryMap,
) -> (Vec<Option<String>>, BTreeMap<String, usize>) {
    let mut unmapped = BTreeMap::new();
    let normalised = values
        .iter()
        .map(|value| {
            value.as_ref().map(|raw| match map.lookup(raw) {
                Some(canonical) => canonical.to_owned(),
                None => {
                    *unmapped.entry(raw.clone()).or_insert(0) += 1;
                    raw.clone()
                }
            })
        })
        .collect();
    (normalised, unmapped)
}

/// Canonicalise every categorical column of the table.
///
/// # Errors
///
/// Fails if a categorical column is missing from the frame.
pub fn normalise_categories(
    df: DataFrame,
    vocabularies: &Vocabularies,
) -> Result<(DataFrame, Vec<UnmappedValue>)> {
    let mut df = df;
    let mut report = Vec::new();

    for (column, map) in vocabularies.by_column() {
        let values = text_values(&df, column)?;
        let (normalised, unmapped) = normalise_column(&values, map);

        for (value, occurrences) in unmapped {
            tracing::warn!(
                "{column}: '{value}' ({occurrences}x) is not in the '{}' vocabulary {:?}; kept as-is",
                map.name,
                map.labels()
            );
            report.push(UnmappedValue {
                column: column.to_owned(),
                value,
                occurrences,
            });
        }

        df = put_column(df, Series::new(column.into(), normalised))?;
    }

    tracing::info!(
        "Normalised {} categorical columns ({} unmapped value(s))",
        vocabularies.by_column().len(),
        report.len()
    );
    Ok((df, report))
}

/// Strip surrounding whitespace from the free-text name fields.
///
/// # Errors
///
/// Fails if a name column is missing from the frame.
pub fn trim_names(df: DataFrame) -> Result<DataFrame> {
    let exprs = [schema::FIRST_NAME, schema::LAST_NAME].map(|name| {
        col(name)
            .cast(DataType::String)
            .str()
            .strip_chars(lit(NULL))
            .alias(name)
    });
    df.lazy()
        .with_columns(exprs)
        .collect()
        .context("Failed to trim name columns")
}
