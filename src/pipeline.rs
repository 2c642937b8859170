//! Pipeline driver.
//!
//! Stages run strictly forward, each taking the table by value:
//!
//! ```text
//! load -> normalise -> impute -> outliers -> dedup -> validate
//!      -> features -> scale -> encode + assemble -> save
//! ```
//!
//! Medians and the outlier fence are taken over every loaded row. Duplicates
//! are dropped only once no cell can change any more, so rows that become
//! identical after imputation or outlier replacement collapse too.
//!
//! # Example
//!
//! ```no_run
//! use student_prep::config::PipelineConfig;
//! use student_prep::pipeline::run_pipeline;
//! use std::path::Path;
//!
//! let report = run_pipeline(
//!     &PipelineConfig::default(),
//!     Path::new("students.csv"),
//!     Path::new("processed.csv"),
//! )?;
//! println!("{}", report.summary());
//! # Ok::<(), student_prep::error::PrepError>(())
//! ```

use crate::assemble::{Layout, assemble};
use crate::cleaning::{
    ImputedColumn, OutlierSummary, UnmappedValue, drop_duplicate_rows, impute_medians,
    normalise_categories, resolve_outliers, trim_names, validate_cleaned,
};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::derive_features;
use crate::scaling::scale_columns;
use crate::table::{load_table, save_table};
use polars::prelude::*;
use std::path::Path;

/// Report generated after a pipeline run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub duplicates_removed: usize,
    pub imputed: Vec<ImputedColumn>,
    pub outliers: OutlierSummary,
    /// Raw categorical values no vocabulary recognised
    pub unmapped: Vec<UnmappedValue>,
    /// Scaled columns that had zero variance
    pub degenerate_scaled: Vec<String>,
    pub columns_after: usize,
    pub duration: std::time::Duration,
}

impl RunReport {
    /// Create a summary message
    pub fn summary(&self) -> String {
        let filled: usize = self.imputed.iter().map(|c| c.filled).sum();
        format!(
            "Pipeline completed: {} rows ({} -> {}, {} duplicate(s) dropped), {} value(s) imputed, {} outlier(s) in {}, {} unmapped categor{}, {} output columns, {:.2}s",
            if self.rows_after < self.rows_before {
                "reduced"
            } else {
                "unchanged"
            },
            self.rows_before,
            self.rows_after,
            self.duplicates_removed,
            filled,
            self.outliers.flagged.len(),
            self.outliers.column,
            self.unmapped.len(),
            if self.unmapped.len() == 1 { "y" } else { "ies" },
            self.columns_after,
            self.duration.as_secs_f64()
        )
    }
}

/// Result of running the stages on an in-memory table.
#[derive(Debug, Clone)]
pub struct Processed {
    pub table: DataFrame,
    pub report: RunReport,
}

/// Run every stage on a table already conformed to the raw schema.
///
/// # Errors
///
/// Aborts on the first fatal stage error; nothing partial is returned.
pub fn process(df: DataFrame, config: &PipelineConfig) -> Result<Processed> {
    let start = std::time::Instant::now();
    let rows_before = df.height();

    let df = trim_names(df)?;
    let (df, unmapped) = normalise_categories(df, &config.vocabularies)?;

    let (df, imputed) = impute_medians(df, &config.impute_columns)?;
    let (df, outliers) = resolve_outliers(
        df,
        &config.outliers.column,
        config.outliers.iqr_multiplier,
    )?;

    let (df, duplicates_removed) = if config.drop_duplicates {
        drop_duplicate_rows(df)?
    } else {
        (df, 0)
    };
    validate_cleaned(&df, &config.impute_columns, &config.grade_columns)?;

    let df = derive_features(df, &config.features)?;
    let (df, degenerate_scaled) = scale_columns(df, &config.scale_columns)?;

    let table = assemble(
        &df,
        &Layout {
            scaled: &config.scale_columns,
            one_hot: &config.one_hot_columns,
            binary: &config.binary_columns,
        },
    )?;

    let report = RunReport {
        rows_before,
        rows_after: table.height(),
        duplicates_removed,
        imputed,
        outliers,
        unmapped,
        degenerate_scaled,
        columns_after: table.width(),
        duration: start.elapsed(),
    };

    Ok(Processed { table, report })
}

/// Load the raw extract, process it, and write the result.
///
/// # Errors
///
/// Fails on any load, stage or write error. The output file is only
/// written once every stage has succeeded.
pub fn run_pipeline(
    config: &PipelineConfig,
    input_path: &Path,
    output_path: &Path,
) -> Result<RunReport> {
    let raw = load_table(input_path)?;
    let Processed { mut table, report } = process(raw, config)?;
    save_table(&mut table, output_path)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepError;
    use crate::schema::{self, RAW_COLUMNS};
    use crate::table::{complete_numeric_values, numeric_values};

    /// Five students, one duplicated, one missing Python grade, one
    /// implausible study-hours entry.
    fn raw_frame() -> anyhow::Result<DataFrame> {
        let columns = vec![
            Series::new("fNAME".into(), vec!["Ana", "Bo", "Cy", "Di", "Ana", "Ed"]),
            Series::new("lNAME".into(), vec!["Lee", "Ng", "Ode", "Paz", " Lee", "Qi"]),
            Series::new("Age".into(), vec![23.0, 31.0, 44.0, 25.0, 23.0, 27.0]),
            Series::new("gender".into(), vec!["F", "male", "M", "Female", "female", "Male"]),
            Series::new("country".into(), vec!["Norway", "rsa", "Kenya", "norge", "Norway", "Kenya"]),
            Series::new(
                "residence".into(),
                vec!["Private", "BI-Residence", "Sognsvann", "Private", "Private", "BI Residence"],
            ),
            Series::new("entryEXAM".into(), vec![72.0, 80.0, 91.0, 66.0, 72.0, 85.0]),
            Series::new(
                "prevEducation".into(),
                vec!["Bachelors", "Diploma", "Doctorate", "HighSchool", "bachelors", "Masters"],
            ),
            Series::new("studyHOURS".into(), vec![140.0, 150.0, 145.0, 138.0, 140.0, 900.0]),
            Series::new(
                "Python".into(),
                vec![Some(80.0), None, Some(90.0), Some(60.0), Some(80.0), Some(70.0)],
            ),
            Series::new("DB".into(), vec![70.0, 60.0, 88.0, 50.0, 70.0, 76.0]),
        ];
        assert_eq!(columns.len(), RAW_COLUMNS.len());
        Ok(DataFrame::new(columns.into_iter().map(Column::from).collect())?)
    }

    #[test]
    fn test_process_end_to_end() -> anyhow::Result<()> {
        let Processed { table, report } = process(raw_frame()?, &PipelineConfig::default())?;

        assert_eq!(report.rows_before, 6);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(table.height(), 5);
        assert!(report.unmapped.is_empty(), "{:?}", report.unmapped);

        let python = report
            .imputed
            .iter()
            .find(|c| c.column == schema::PYTHON)
            .expect("python imputation");
        // Every loaded row counts, the duplicate included: 60 70 80 80 90
        assert_eq!(python.filled, 1);
        assert!((python.median - 80.0).abs() < 1e-9);

        // Flagged positions refer to the loaded rows.
        assert_eq!(report.outliers.flagged, vec![5]);
        assert!((report.outliers.replacement - 140.0).abs() < 1e-9);
        assert!(report.summary().contains("1 duplicate(s) dropped"));

        for column in table.get_columns() {
            assert_eq!(column.null_count(), 0, "{}", column.name());
        }
        for name in ["Age", "entryEXAM", "studyHOURS", "Python", "DB", "Programming Average"] {
            for v in complete_numeric_values(&table, name)? {
                assert!((0.0..=1.0).contains(&v), "{name}: {v}");
            }
        }
        assert_eq!(
            numeric_values(&table, "Education_Level")?,
            vec![Some(3.0), Some(2.0), Some(5.0), Some(1.0), Some(4.0)]
        );
        assert!(table.column("gender").is_err());
        assert!(table.column("Studying Category").is_err());
        assert!(table.column("gender_Female").is_ok());
        Ok(())
    }

    #[test]
    fn test_rows_identical_after_imputation_collapse() -> anyhow::Result<()> {
        // Ana's two rows differ only in the missing Python grade, which the
        // median (70) fills with the value of the other copy.
        let columns = vec![
            Series::new("fNAME".into(), vec!["Ana", "Ana", "Bo", "Cy"]),
            Series::new("lNAME".into(), vec!["Lee", "Lee", "Ng", "Ode"]),
            Series::new("Age".into(), vec![23.0, 23.0, 31.0, 44.0]),
            Series::new("gender".into(), vec!["Female", "Female", "Male", "Male"]),
            Series::new("country".into(), vec!["Norway", "Norway", "Kenya", "Spain"]),
            Series::new(
                "residence".into(),
                vec!["Private", "Private", "Sognsvann", "BI Residence"],
            ),
            Series::new("entryEXAM".into(), vec![72.0, 72.0, 80.0, 91.0]),
            Series::new(
                "prevEducation".into(),
                vec!["Bachelors", "Bachelors", "Diploma", "Masters"],
            ),
            Series::new("studyHOURS".into(), vec![140.0, 140.0, 150.0, 145.0]),
            Series::new("Python".into(), vec![None, Some(70.0), Some(60.0), Some(80.0)]),
            Series::new("DB".into(), vec![70.0, 70.0, 60.0, 88.0]),
        ];
        let df = DataFrame::new(columns.into_iter().map(Column::from).collect())?;

        let Processed { table, report } = process(df, &PipelineConfig::default())?;

        assert_eq!(report.imputed[3].column, schema::PYTHON);
        assert!((report.imputed[3].median - 70.0).abs() < 1e-9);
        assert!(report.outliers.flagged.is_empty());
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(table.height(), 3);
        let distinct = table.unique_stable(None, UniqueKeepStrategy::First, None)?;
        assert_eq!(distinct.height(), table.height());
        Ok(())
    }

    #[test]
    fn test_unmapped_education_aborts_at_encoding() -> anyhow::Result<()> {
        let mut df = raw_frame()?;
        df.with_column(Series::new(
            "prevEducation".into(),
            vec!["Bachelors", "Diploma", "Doctorate", "Kindergarten", "Bachelors", "Masters"],
        ))?;

        match process(df, &PipelineConfig::default()) {
            Err(PrepError::InvalidCategory { column, value }) => {
                assert_eq!(column, "prevEducation");
                assert_eq!(value, "Kindergarten");
            }
            other => panic!("expected InvalidCategory, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_all_missing_python_aborts() -> anyhow::Result<()> {
        let mut df = raw_frame()?;
        df.with_column(Series::new("Python".into(), vec![None::<f64>; 6]))?;

        assert!(matches!(
            process(df, &PipelineConfig::default()),
            Err(PrepError::AllMissing { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_keeping_duplicates_when_disabled() -> anyhow::Result<()> {
        let config = PipelineConfig {
            drop_duplicates: false,
            ..Default::default()
        };
        let Processed { table, report } = process(raw_frame()?, &config)?;
        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(table.height(), 6);
        Ok(())
    }
}
