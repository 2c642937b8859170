//! # student-prep
//!
//! Turns a raw student-records extract into an analysis-ready table:
//! categorical labels canonicalised, gaps median-imputed, study-hour
//! outliers resolved, features derived, numeric columns min-max scaled and
//! categorical columns encoded.
//!
//! ## Quick Start
//!
//! ```no_run
//! use student_prep::config::PipelineConfig;
//! use student_prep::pipeline::run_pipeline;
//! use std::path::Path;
//!
//! let config = PipelineConfig::default();
//! let report = run_pipeline(&config, Path::new("raw.csv"), Path::new("processed.csv"))?;
//! println!("{}", report.summary());
//! # Ok::<(), student_prep::error::PrepError>(())
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: the fixed eleven-column layout of the extract
//! - [`table`]: delimited-file loading/saving and column access
//! - [`cleaning`]: normalisation, de-duplication, imputation, outliers
//! - [`features`]: derived columns
//! - [`scaling`]: min-max scaling
//! - [`encoding`]: ordinal, one-hot and binary encoders
//! - [`assemble`]: final column selection and ordering
//! - [`pipeline`]: the driver tying the stages together
//! - [`config`]: remapping tables, thresholds and column lists
//! - [`error`]: error types
//! - [`logging`]: `tracing` subscriber set-up

#![warn(clippy::all, rust_2018_idioms)]

pub mod assemble;
pub mod cleaning;
pub mod config;
pub mod encoding;
pub mod error;
pub mod features;
pub mod logging;
pub mod pipeline;
pub mod scaling;
pub mod schema;
pub mod stats;
pub mod table;
