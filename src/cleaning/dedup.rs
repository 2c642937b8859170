use crate::error::{Result, ResultExt as _};
use polars::prelude::*;

/// Remove exact duplicate rows, keeping the first occurrence and the
/// original row order. Returns the frame and the number of rows removed.
///
/// Nulls compare equal to each other and unequal to any value, so an empty
/// string and a missing entry stay distinct.
///
/// # Errors
///
/// Fails if the frame cannot be grouped by its columns.
pub fn drop_duplicate_rows(df: DataFrame) -> Result<(DataFrame, usize)> {
    let before = df.height();
    let deduped = df
        .unique_stable(None, UniqueKeepStrategy::First, None)
        .context("Failed to drop duplicate rows")?;
    let removed = before - deduped.height();

    if removed > 0 {
        tracing::info!("Dropped {removed} duplicate row(s)");
    }
    Ok((deduped, removed))
}
