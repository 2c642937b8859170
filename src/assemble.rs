//! Final table assembly.
//!
//! Column order: scaled numeric columns, then `isAdult` and the two ordinal
//! ranks, then one-hot groups, then binary groups. Names, raw categorical
//! columns and the `Studying Category` helper do not survive.

use crate::encoding::{binary_encode, one_hot_encode};
use crate::error::{Result, ResultExt as _};
use crate::schema;
use polars::prelude::*;

/// Which columns go where in the output.
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    pub scaled: &'a [String],
    pub one_hot: &'a [String],
    pub binary: &'a [String],
}

/// Build the output frame from the scaled, feature-enriched table.
///
/// # Errors
///
/// Fails if a referenced column is missing or an encoder rejects its input.
pub fn assemble(df: &DataFrame, layout: &Layout<'_>) -> Result<DataFrame> {
    let mut exprs: Vec<Expr> = layout.scaled.iter().map(|name| col(name.as_str())).collect();

    exprs.extend(
        [
            schema::IS_ADULT,
            schema::EDUCATION_LEVEL,
            schema::STUDYING_CATEGORY_ENCODED,
        ]
        .map(col),
    );

    for name in layout.one_hot {
        exprs.extend(one_hot_encode(df, name)?);
    }

    for name in layout.binary {
        exprs.extend(binary_encode(df, name)?);
    }

    let out = df
        .clone()
        .lazy()
        .select(exprs)
        .collect()
        .context("Failed to assemble output columns")?;
    tracing::info!(
        "Assembled {} rows x {} columns",
        out.height(),
        out.width()
    );
    Ok(out)
}
