//! Order statistics over the present values of a numeric column.
//!
//! Missing entries are ignored. Quantiles interpolate linearly between the
//! two closest ranks.

use crate::error::Result;
use polars::prelude::*;

fn present(values: &[Option<f64>]) -> Float64Chunked {
    Float64Chunked::from_iter_options("values".into(), values.iter().copied())
}

/// Median of the present values, `None` if there are none.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    present(values).median()
}

/// Linear-interpolated quantile `q` in `[0, 1]` of the present values.
///
/// # Errors
///
/// Fails if `q` lies outside `[0, 1]`.
pub fn quantile(values: &[Option<f64>], q: f64) -> Result<Option<f64>> {
    Ok(present(values).quantile(q, QuantileMethod::Linear)?)
}

/// Interquartile range fence: `[Q1 - k*IQR, Q3 + k*IQR]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fence {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Fence {
    /// Compute the fence, `None` if the column has no values.
    ///
    /// # Errors
    ///
    /// Propagates quantile failures.
    pub fn from_values(values: &[Option<f64>], multiplier: f64) -> Result<Option<Self>> {
        let (Some(q1), Some(q3)) = (quantile(values, 0.25)?, quantile(values, 0.75)?) else {
            return Ok(None);
        };
        let iqr = q3 - q1;
        Ok(Some(Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        }))
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}
