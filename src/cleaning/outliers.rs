use crate::error::{PrepError, Result};
use crate::stats::{self, Fence};
use crate::table::{complete_numeric_values, put_column};
use polars::prelude::*;

/// What outlier resolution did to a column.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierSummary {
    pub column: String,
    pub fence: Fence,
    /// Row positions that fell outside the fence, ascending.
    pub flagged: Vec<usize>,
    pub replacement: f64,
}

/// Flag values outside `[Q1 - k*IQR, Q3 + k*IQR]` and replace them with the
/// median of the values inside the fence.
///
/// Both the fence and the replacement come from the column as given, so the
/// result is the same on every run.
///
/// # Errors
///
/// Returns [`PrepError::AllMissing`] for an empty column.
pub fn resolve_iqr_outliers(
    column: &str,
    values: &[f64],
    multiplier: f64,
) -> Result<(Vec<f64>, OutlierSummary)> {
    let present: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    let all_missing = || PrepError::AllMissing {
        column: column.to_owned(),
    };

    let fence = Fence::from_values(&present, multiplier)?.ok_or_else(all_missing)?;

    let flagged: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| !fence.contains(**v))
        .map(|(idx, _)| idx)
        .collect();

    let inliers: Vec<Option<f64>> = values
        .iter()
        .filter(|v| fence.contains(**v))
        .copied()
        .map(Some)
        .collect();
    // The fence always contains Q1..Q3, so there is at least one inlier.
    let replacement = stats::median(&inliers).ok_or_else(all_missing)?;

    let mut resolved = values.to_vec();
    for &idx in &flagged {
        if let Some(slot) = resolved.get_mut(idx) {
            *slot = replacement;
        }
    }

    Ok((
        resolved,
        OutlierSummary {
            column: column.to_owned(),
            fence,
            flagged,
            replacement,
        },
    ))
}

/// Resolve outliers in one column of the table.
///
/// Other numeric columns are left alone; their extremes are reviewed by hand.
///
/// # Errors
///
/// Fails if the column is absent, incomplete or empty.
pub fn resolve_outliers(
    df: DataFrame,
    column: &str,
    multiplier: f64,
) -> Result<(DataFrame, OutlierSummary)> {
    let values = complete_numeric_values(&df, column)?;
    let (resolved, summary) = resolve_iqr_outliers(column, &values, multiplier)?;

    tracing::debug!(
        "{column}: Q1={} Q3={} fence=[{}, {}]",
        summary.fence.q1,
        summary.fence.q3,
        summary.fence.lower,
        summary.fence.upper
    );
    tracing::info!(
        "{column}: replaced {} outlier(s) at rows {:?} with {}",
        summary.flagged.len(),
        summary.flagged,
        summary.replacement
    );

    let df = put_column(df, Series::new(column.into(), resolved))?;
    Ok((df, summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOURS: [f64; 8] = [10.0, 120.0, 125.0, 130.0, 500.0, 128.0, 126.0, 131.0];

    #[test]
    fn test_extremes_replaced_with_inlier_median() -> anyhow::Result<()> {
        let (resolved, summary) = resolve_iqr_outliers("studyHOURS", &HOURS, 1.5)?;

        // Inliers 120 125 126 128 130 131 -> median 127
        assert_eq!(summary.flagged, vec![0, 4]);
        assert!((summary.replacement - 127.0).abs() < 1e-9);
        assert_eq!(
            resolved,
            vec![127.0, 120.0, 125.0, 130.0, 127.0, 128.0, 126.0, 131.0]
        );
        Ok(())
    }

    #[test]
    fn test_resolved_values_lie_inside_original_fence() -> anyhow::Result<()> {
        let (resolved, summary) = resolve_iqr_outliers("studyHOURS", &HOURS, 1.5)?;
        assert!(resolved.iter().all(|v| summary.fence.contains(*v)));
        Ok(())
    }

    #[test]
    fn test_resolution_is_deterministic() -> anyhow::Result<()> {
        let first = resolve_iqr_outliers("studyHOURS", &HOURS, 1.5)?;
        let second = resolve_iqr_outliers("studyHOURS", &HOURS, 1.5)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_clean_column_is_untouched() -> anyhow::Result<()> {
        let values = [140.0, 142.0, 150.0, 155.0, 149.0];
        let (resolved, summary) = resolve_iqr_outliers("studyHOURS", &values, 1.5)?;
        assert!(summary.flagged.is_empty());
        assert_eq!(resolved, values.to_vec());
        Ok(())
    }

    #[test]
    fn test_empty_column_is_fatal() {
        assert!(matches!(
            resolve_iqr_outliers("studyHOURS", &[], 1.5),
            Err(PrepError::AllMissing { .. })
        ));
    }

    #[test]
    fn test_frame_column_replaced() -> anyhow::Result<()> {
        let df = DataFrame::new(vec![Column::from(Series::new(
            "studyHOURS".into(),
            HOURS.to_vec(),
        ))])?;

        let (df, summary) = resolve_outliers(df, "studyHOURS", 1.5)?;

        assert_eq!(summary.flagged.len(), 2);
        let hours = complete_numeric_values(&df, "studyHOURS")?;
        assert!(!hours.contains(&500.0));
        Ok(())
    }
}
