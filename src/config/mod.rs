//! Configuration system with YAML schema and validation.
//!
//! Implements Poka-Yoke (mistake-proofing) through:
//! - Type-safe configuration structs with `deny_unknown_fields`
//! - Schema validation via `validator`
//! - Runtime semantic validation
//!
//! # Example
//!
//! ```yaml
//! reproducibility:
//!   seed: 42
//! series:
//!   days: 60
//!   end_date: 2024-11-30
//!   user_id: usr_001
//! output:
//!   directory: data/raw
//! ```

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::{SimError, SimResult};

/// Longest run accepted from configuration (one hundred years).
pub const MAX_DAYS: usize = 36_500;

/// Top-level generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Reproducibility settings.
    #[validate(nested)]
    #[serde(default)]
    pub reproducibility: ReproducibilityConfig,

    /// Series shape.
    #[validate(nested)]
    #[serde(default)]
    pub series: SeriesConfig,

    /// Where the tabular files are written.
    #[validate(nested)]
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl GeneratorConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Run schema and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for schema violations and `Config` for
    /// semantic ones.
    pub fn check(&self) -> SimResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> SimResult<()> {
        if self.series.user_id.chars().any(char::is_control) {
            return Err(SimError::config(format!(
                "user_id must not contain control characters, got {:?}",
                self.series.user_id
            )));
        }

        if self.output.solar_file == self.output.bio_file {
            return Err(SimError::config(format!(
                "solar_file and bio_file must differ, both are '{}'",
                self.output.solar_file
            )));
        }

        if let Some(end_date) = self.series.end_date {
            let span = u64::try_from(self.series.days.saturating_sub(1)).unwrap_or(u64::MAX);
            if end_date.checked_sub_days(chrono::Days::new(span)).is_none() {
                return Err(SimError::config(format!(
                    "{} days ending {end_date} start before the calendar range",
                    self.series.days
                )));
            }
        }

        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            reproducibility: ReproducibilityConfig::default(),
            series: SeriesConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct GeneratorConfigBuilder {
    seed: Option<u64>,
    days: Option<usize>,
    end_date: Option<NaiveDate>,
    user_id: Option<String>,
    output_dir: Option<PathBuf>,
}

impl GeneratorConfigBuilder {
    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the run length in days.
    #[must_use]
    pub const fn days(mut self, days: usize) -> Self {
        self.days = Some(days);
        self
    }

    /// Set the last simulated day.
    #[must_use]
    pub const fn end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Set the subject identifier.
    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the output directory.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Build the configuration.
    ///
    /// The result is not validated; call [`GeneratorConfig::check`] when the
    /// values come from user input.
    #[must_use]
    pub fn build(self) -> GeneratorConfig {
        let mut config = GeneratorConfig::default();

        if let Some(seed) = self.seed {
            config.reproducibility.seed = seed;
        }
        if let Some(days) = self.days {
            config.series.days = days;
        }
        if let Some(end_date) = self.end_date {
            config.series.end_date = Some(end_date);
        }
        if let Some(user_id) = self.user_id {
            config.series.user_id = user_id;
        }
        if let Some(dir) = self.output_dir {
            config.output.directory = dir;
        }

        config
    }
}

/// Reproducibility settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ReproducibilityConfig {
    /// Master seed for all RNG streams.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

const fn default_seed() -> u64 {
    42
}

impl Default for ReproducibilityConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

/// Shape of the generated series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SeriesConfig {
    /// Number of simulated days.
    #[validate(range(min = 1, max = 36500))]
    #[serde(default = "default_days")]
    pub days: usize,
    /// Last simulated day; today when absent.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Subject identifier on every bio record.
    #[validate(length(min = 1))]
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

const fn default_days() -> usize {
    60
}

fn default_user_id() -> String {
    "usr_001".to_string()
}

impl SeriesConfig {
    /// Configured end date, or today's local date.
    #[must_use]
    pub fn resolved_end_date(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            days: default_days(),
            end_date: None,
            user_id: default_user_id(),
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving both files, created if missing.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// File name of the solar table.
    #[validate(length(min = 1))]
    #[serde(default = "default_solar_file")]
    pub solar_file: String,
    /// File name of the bio table.
    #[validate(length(min = 1))]
    #[serde(default = "default_bio_file")]
    pub bio_file: String,
}

fn default_directory() -> PathBuf {
    PathBuf::from("data/raw")
}

fn default_solar_file() -> String {
    "solar_history.csv".to_string()
}

fn default_bio_file() -> String {
    "bio_history.csv".to_string()
}

impl OutputConfig {
    /// Full path of the solar table.
    #[must_use]
    pub fn solar_path(&self) -> PathBuf {
        self.directory.join(&self.solar_file)
    }

    /// Full path of the bio table.
    #[must_use]
    pub fn bio_path(&self) -> PathBuf {
        self.directory.join(&self.bio_file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            solar_file: default_solar_file(),
            bio_file: default_bio_file(),
        }
    }
}
