//! Centralised error handling for the preparation pipeline.
//!
//! Failures are shallow: a run either completes or aborts at the first fatal
//! problem. The enum below names each fatal category so callers can match on
//! it, while the `From` impls let `?` lift I/O, Polars and JSON errors:
//!
//! ```no_run
//! use student_prep::error::{PrepError, Result};
//! use std::fs;
//!
//! fn read_raw(path: &str) -> Result<String> {
//!     let content = fs::read_to_string(path)?;
//!     Ok(content)
//! }
//!
//! match read_raw("students.csv") {
//!     Err(PrepError::Io(e)) => eprintln!("cannot read extract: {e}"),
//!     Err(other) => eprintln!("{other}"),
//!     Ok(_) => {}
//! }
//! ```

use std::fmt;

/// Main error type for pipeline operations.
#[derive(Debug)]
pub enum PrepError {
    /// I/O errors (reading the extract, writing the output)
    Io(std::io::Error),

    /// Header does not match the expected student-record schema
    Schema(String),

    /// Every value of a numeric column is missing, so no median exists
    AllMissing { column: String },

    /// A value that has no place in a fixed vocabulary or ordinal scale
    InvalidCategory { column: String, value: String },

    /// A grade that falls outside the 0 to 100 scale
    OutOfRange {
        column: String,
        row: usize,
        value: f64,
    },

    /// Nulls left in a column that must be complete
    MissingValues { column: String, count: usize },

    /// Data processing errors (Polars, casting, etc.)
    DataProcessing(String),

    /// Configuration errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for PrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Schema(msg) => write!(f, "Schema mismatch: {msg}"),
            Self::AllMissing { column } => {
                write!(f, "Column '{column}' has no values; median is undefined")
            }
            Self::InvalidCategory { column, value } => {
                write!(f, "Column '{column}' holds unrecognised category '{value}'")
            }
            Self::OutOfRange { column, row, value } => {
                write!(f, "Column '{column}' row {row}: {value} is outside [0, 100]")
            }
            Self::MissingValues { column, count } => {
                write!(f, "Column '{column}' still has {count} missing value(s)")
            }
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PrepError {}

impl From<std::io::Error> for PrepError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for PrepError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PrepError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: PrepError = e.into();
            PrepError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: PrepError = e.into();
            PrepError::Other(format!("{}: {}", f(), err))
        })
    }
}
