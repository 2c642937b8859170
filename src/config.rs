//! Pipeline configuration.
//!
//! Every remapping table, threshold and column list the stages use lives
//! here as a named structure. The built-in defaults describe the student
//! extract; a JSON file may override any subset of fields.

use crate::error::{PrepError, Result, ResultExt as _};
use crate::schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Current configuration format version
pub const CONFIG_VERSION: &str = "0.1";

/// Named mapping from raw variant to canonical label.
///
/// Keys are stored trimmed and lower-cased so lookups only need the same
/// normalisation applied to the raw value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMap {
    pub name: String,
    pub mapping: BTreeMap<String, String>,
}

impl CategoryMap {
    pub fn new<'a>(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            name: name.into(),
            mapping: pairs
                .into_iter()
                .map(|(raw, canonical)| (fold(raw), canonical.to_owned()))
                .collect(),
        }
    }

    /// Canonical label for a raw value, if the map knows it.
    pub fn lookup(&self, raw: &str) -> Option<&str> {
        self.mapping.get(&fold(raw)).map(String::as_str)
    }

    /// Distinct canonical labels, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.mapping.values().map(String::as_str).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Re-fold keys after deserialisation so hand-written files may use any
    /// casing or padding.
    fn normalise_keys(&mut self) {
        self.mapping = std::mem::take(&mut self.mapping)
            .into_iter()
            .map(|(raw, canonical)| (fold(&raw), canonical))
            .collect();
    }
}

/// Trim and case-fold a raw category value.
pub fn fold(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// The four categorical remapping tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabularies {
    #[serde(default = "default_gender")]
    pub gender: CategoryMap,

    #[serde(default = "default_prev_education")]
    pub prev_education: CategoryMap,

    #[serde(default = "default_country")]
    pub country: CategoryMap,

    #[serde(default = "default_residence")]
    pub residence: CategoryMap,
}

impl Default for Vocabularies {
    fn default() -> Self {
        Self {
            gender: default_gender(),
            prev_education: default_prev_education(),
            country: default_country(),
            residence: default_residence(),
        }
    }
}

impl Vocabularies {
    /// Pairs of (column, map) in the order the normaliser applies them.
    pub fn by_column(&self) -> [(&'static str, &CategoryMap); 4] {
        [
            (schema::GENDER, &self.gender),
            (schema::COUNTRY, &self.country),
            (schema::RESIDENCE, &self.residence),
            (schema::PREV_EDUCATION, &self.prev_education),
        ]
    }
}

/// IQR outlier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierConfig {
    #[serde(default = "default_outlier_column")]
    pub column: String,

    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            column: default_outlier_column(),
            iqr_multiplier: default_iqr_multiplier(),
        }
    }
}

/// Thresholds for the derived columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// `isAdult` is true from this age upward
    #[serde(default = "default_adult_age")]
    pub adult_age: f64,

    /// Study hours strictly below this are `Low`
    #[serde(default = "default_study_low_below")]
    pub study_low_below: f64,

    /// Study hours from this value upward are `High`
    #[serde(default = "default_study_high_from")]
    pub study_high_from: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            adult_age: default_adult_age(),
            study_low_below: default_study_low_below(),
            study_high_from: default_study_high_from(),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub vocabularies: Vocabularies,

    #[serde(default = "default_true")]
    pub drop_duplicates: bool,

    #[serde(default = "default_impute_columns")]
    pub impute_columns: Vec<String>,

    #[serde(default)]
    pub outliers: OutlierConfig,

    #[serde(default = "default_grade_columns")]
    pub grade_columns: Vec<String>,

    #[serde(default)]
    pub features: FeatureConfig,

    #[serde(default = "default_scale_columns")]
    pub scale_columns: Vec<String>,

    #[serde(default = "default_one_hot_columns")]
    pub one_hot_columns: Vec<String>,

    #[serde(default = "default_binary_columns")]
    pub binary_columns: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            vocabularies: Vocabularies::default(),
            drop_duplicates: default_true(),
            impute_columns: default_impute_columns(),
            outliers: OutlierConfig::default(),
            grade_columns: default_grade_columns(),
            features: FeatureConfig::default(),
            scale_columns: default_scale_columns(),
            one_hot_columns: default_one_hot_columns(),
            binary_columns: default_binary_columns(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file {}", path.as_ref().display())
        })?;
        Self::from_json(&content)
    }

    /// Parse a configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, an unsupported version, or inconsistent
    /// settings.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.vocabularies.gender.normalise_keys();
        config.vocabularies.prev_education.normalise_keys();
        config.vocabularies.country.normalise_keys();
        config.vocabularies.residence.normalise_keys();
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    ///
    /// Fails only if serialisation itself fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to a JSON file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).context("Failed to write config file")
    }

    /// Reject settings no run could satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(PrepError::Config(format!(
                "Unsupported config version '{}', expected '{CONFIG_VERSION}'",
                self.version
            )));
        }

        for name in self
            .impute_columns
            .iter()
            .chain(&self.grade_columns)
            .chain(std::iter::once(&self.outliers.column))
        {
            if !schema::NUMERIC_COLUMNS.contains(&name.as_str()) {
                return Err(PrepError::Config(format!(
                    "'{name}' is not a numeric column of the extract"
                )));
            }
        }

        if !(self.outliers.iqr_multiplier.is_finite() && self.outliers.iqr_multiplier > 0.0) {
            return Err(PrepError::Config(format!(
                "iqr_multiplier must be positive, got {}",
                self.outliers.iqr_multiplier
            )));
        }

        if self.features.study_low_below > self.features.study_high_from {
            return Err(PrepError::Config(format!(
                "study_low_below ({}) exceeds study_high_from ({})",
                self.features.study_low_below, self.features.study_high_from
            )));
        }

        Ok(())
    }
}

// Default value functions
fn default_version() -> String {
    CONFIG_VERSION.to_owned()
}

fn default_true() -> bool {
    true
}

fn default_gender() -> CategoryMap {
    CategoryMap::new(
        "gender",
        [
            ("female", "Female"),
            ("f", "Female"),
            ("male", "Male"),
            ("m", "Male"),
        ],
    )
}

fn default_prev_education() -> CategoryMap {
    CategoryMap::new(
        "prevEducation",
        [
            ("high school", "High School"),
            ("highschool", "High School"),
            ("diploma", "Diploma"),
            ("diplomaaa", "Diploma"),
            ("bachelors", "Bachelors"),
            ("bachelor", "Bachelors"),
            ("barrrchelors", "Bachelors"),
            ("masters", "Masters"),
            ("master", "Masters"),
            ("doctorate", "Doctorate"),
            ("phd", "Doctorate"),
        ],
    )
}

fn default_country() -> CategoryMap {
    CategoryMap::new(
        "country",
        [
            ("norway", "Norway"),
            ("norge", "Norway"),
            ("rsa", "South Africa"),
            ("south africa", "South Africa"),
            ("uk", "UK"),
            ("united kingdom", "UK"),
            ("somali", "Somalia"),
            ("somalia", "Somalia"),
            ("kenya", "Kenya"),
            ("uganda", "Uganda"),
            ("nigeria", "Nigeria"),
            ("germany", "Germany"),
            ("denmark", "Denmark"),
            ("netherlands", "Netherlands"),
            ("italy", "Italy"),
            ("spain", "Spain"),
            ("france", "France"),
            ("morocco", "Morocco"),
            ("lebanon", "Lebanon"),
        ],
    )
}

fn default_residence() -> CategoryMap {
    CategoryMap::new(
        "residence",
        [
            ("private", "Private"),
            ("sognsvann", "Sognsvann"),
            ("bi residence", "BI Residence"),
            ("bi-residence", "BI Residence"),
            ("bi_residence", "BI Residence"),
            ("biresidence", "BI Residence"),
        ],
    )
}

fn default_outlier_column() -> String {
    schema::STUDY_HOURS.to_owned()
}

fn default_iqr_multiplier() -> f64 {
    1.5
}

fn default_adult_age() -> f64 {
    25.0
}

fn default_study_low_below() -> f64 {
    130.0
}

fn default_study_high_from() -> f64 {
    150.0
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_owned()).collect()
}

fn default_impute_columns() -> Vec<String> {
    owned(&schema::NUMERIC_COLUMNS)
}

fn default_grade_columns() -> Vec<String> {
    owned(&[schema::ENTRY_EXAM, schema::PYTHON, schema::DB])
}

fn default_scale_columns() -> Vec<String> {
    owned(&[
        schema::AGE,
        schema::ENTRY_EXAM,
        schema::STUDY_HOURS,
        schema::PYTHON,
        schema::DB,
        schema::PROGRAMMING_AVERAGE,
    ])
}

fn default_one_hot_columns() -> Vec<String> {
    owned(&[schema::GENDER])
}

fn default_binary_columns() -> Vec<String> {
    owned(&[schema::COUNTRY, schema::RESIDENCE])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_folds_case_and_padding() {
        let map = default_gender();
        assert_eq!(map.lookup("  FEMALE "), Some("Female"));
        assert_eq!(map.lookup("m"), Some("Male"));
        assert_eq!(map.lookup("other"), None);
    }

    #[test]
    fn test_education_vocabulary_has_five_labels() {
        let map = default_prev_education();
        assert_eq!(
            map.labels(),
            vec!["Bachelors", "Diploma", "Doctorate", "High School", "Masters"]
        );
    }

    #[test]
    fn test_gender_vocabulary_is_binary() {
        assert_eq!(default_gender().labels(), vec!["Female", "Male"]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() -> anyhow::Result<()> {
        let config = PipelineConfig::from_json(
            r#"{ "outliers": { "iqr_multiplier": 3.0 }, "drop_duplicates": false }"#,
        )?;

        assert!((config.outliers.iqr_multiplier - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.outliers.column, "studyHOURS");
        assert!(!config.drop_duplicates);
        assert_eq!(config.vocabularies.gender.lookup("F"), Some("Female"));
        Ok(())
    }

    #[test]
    fn test_hand_written_keys_are_folded() -> anyhow::Result<()> {
        let config = PipelineConfig::from_json(
            r#"{ "vocabularies": { "residence": { "name": "residence", "mapping": { " Campus ": "Campus" } } } }"#,
        )?;
        assert_eq!(config.vocabularies.residence.lookup("campus"), Some("Campus"));
        Ok(())
    }

    #[test]
    fn test_round_trip_through_json() -> anyhow::Result<()> {
        let json = PipelineConfig::default().to_json()?;
        assert!(json.contains("\"version\": \"0.1\""));
        let parsed = PipelineConfig::from_json(&json)?;
        assert_eq!(parsed.scale_columns, default_scale_columns());
        Ok(())
    }

    #[test]
    fn test_file_round_trip_keeps_overrides() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("pipeline.json");
        let mut config = PipelineConfig::default();
        config.outliers.iqr_multiplier = 3.0;
        config.features.adult_age = 21.0;
        config.drop_duplicates = false;

        config.to_file(&path)?;
        let loaded = PipelineConfig::from_file(&path)?;

        assert!((loaded.outliers.iqr_multiplier - 3.0).abs() < f64::EPSILON);
        assert!((loaded.features.adult_age - 21.0).abs() < f64::EPSILON);
        assert!(!loaded.drop_duplicates);
        assert_eq!(loaded.to_json()?, config.to_json()?);
        Ok(())
    }

    #[test]
    fn test_missing_config_file_is_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let result = PipelineConfig::from_file(dir.path().join("absent.json"));
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_rejects_non_numeric_impute_column() {
        let result = PipelineConfig::from_json(r#"{ "impute_columns": ["gender"] }"#);
        assert!(matches!(result, Err(PrepError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let result = PipelineConfig::from_json(r#"{ "version": "9.9" }"#);
        assert!(matches!(result, Err(PrepError::Config(_))));
    }
}
