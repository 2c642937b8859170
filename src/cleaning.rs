//! Cleaning stages: categorical normalisation, duplicate removal, median
//! imputation, IQR outlier resolution, and the post-cleaning checks.
//!
//! Each stage takes the table by value and hands back the transformed table
//! together with a small summary for the run report.

pub mod dedup;
pub mod impute;
pub mod normalise;
pub mod outliers;
pub mod validate;

pub use dedup::drop_duplicate_rows;
pub use impute::{ImputedColumn, impute_median, impute_medians};
pub use normalise::{UnmappedValue, normalise_categories, normalise_column, trim_names};
pub use outliers::{OutlierSummary, resolve_iqr_outliers, resolve_outliers};
pub use validate::validate_cleaned;
