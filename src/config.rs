//! Preprocessing configuration.
//!
//! A run is fully described by one immutable [`PreprocessConfig`]: which
//! column is the prediction target, which responder columns feed lag
//! construction and how they are renamed, the chronological split ratio,
//! the start-date cutoff, and where the two output files go.
//!
//! Configurations can be saved to and loaded from TOML or JSON for
//! experiment reproducibility; loaded configurations are validated before
//! use.
//!
//! # Example
//!
//! ```ignore
//! use market_preprocessor::config::PreprocessConfig;
//!
//! let config = PreprocessConfig::default()
//!     .with_val_ratio(0.1)
//!     .with_start_date(1400);
//!
//! config.save_toml("configs/run1.toml")?;
//! let loaded = PreprocessConfig::load_toml("configs/run1.toml")?;
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PrepError, Result};

/// Number of responder columns in the raw dataset (`responder_0..responder_8`).
pub const RESPONDER_COUNT: usize = 9;

/// Suffix appended to a responder column name to form its lag-feature name.
pub const LAG_SUFFIX: &str = "_lag_1";

/// Full configuration for one preprocessing run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PreprocessConfig {
    /// Column the label is derived from.
    pub target_col: String,

    /// Responder columns that feed lag construction, in output order.
    pub lag_cols: Vec<String>,

    /// Rename applied to each lag source column (`responder_k` ->
    /// `responder_k_lag_1`). Every entry in `lag_cols` must have a mapping.
    pub lag_rename: BTreeMap<String, String>,

    /// Fraction of rows reserved for the holdout partition. Open interval
    /// (0, 1); the realized holdout may be smaller when rows tie at the
    /// cutoff date.
    pub val_ratio: f64,

    /// Rows with `date_id <= start_dt` are dropped at load time.
    pub start_dt: i64,

    /// When false, the lag-building and merge stages are skipped entirely;
    /// loading and splitting behave identically either way.
    pub include_lags: bool,

    /// Run the post-split leakage and uniqueness checks after persisting.
    pub validate_output: bool,

    /// Output location and file naming.
    pub output: OutputConfig,
}

/// Output location and naming.
///
/// The training/validation and training/test variants of the pipeline
/// differ only in these names, so naming is configuration rather than a
/// second pipeline.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OutputConfig {
    /// Directory the two output files are written into (created if absent).
    pub dir: PathBuf,

    /// File name of the earlier (training) partition.
    pub train_file: String,

    /// File name of the later (validation or test) partition.
    pub holdout_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("preprocessed_data"),
            train_file: "training.parquet".to_string(),
            holdout_file: "validation.parquet".to_string(),
        }
    }
}

impl Default for PreprocessConfig {
    /// Defaults match the original competition dataset: target
    /// `responder_6`, nine lag sources, a 10% holdout, and a start date
    /// of 1400.
    fn default() -> Self {
        let lag_cols: Vec<String> = (0..RESPONDER_COUNT)
            .map(|idx| format!("responder_{idx}"))
            .collect();
        let lag_rename = lag_cols
            .iter()
            .map(|name| (name.clone(), format!("{name}{LAG_SUFFIX}")))
            .collect();

        Self {
            target_col: "responder_6".to_string(),
            lag_cols,
            lag_rename,
            val_ratio: 0.1,
            start_dt: 1400,
            include_lags: true,
            validate_output: false,
            output: OutputConfig::default(),
        }
    }
}

impl PreprocessConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the holdout ratio.
    pub fn with_val_ratio(mut self, ratio: f64) -> Self {
        self.val_ratio = ratio;
        self
    }

    /// Set the start-date cutoff.
    pub fn with_start_date(mut self, start_dt: i64) -> Self {
        self.start_dt = start_dt;
        self
    }

    /// Set the target column.
    pub fn with_target_col(mut self, name: impl Into<String>) -> Self {
        self.target_col = name.into();
        self
    }

    /// Disable lag construction and merging.
    pub fn without_lags(mut self) -> Self {
        self.include_lags = false;
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output.dir = dir.into();
        self
    }

    /// Set the two output file names.
    pub fn with_output_names(
        mut self,
        train_file: impl Into<String>,
        holdout_file: impl Into<String>,
    ) -> Self {
        self.output.train_file = train_file.into();
        self.output.holdout_file = holdout_file.into();
        self
    }

    /// Enable post-run validation of the split.
    pub fn with_output_validation(mut self) -> Self {
        self.validate_output = true;
        self
    }

    /// Renamed (lag-feature) form of each lag source column, in
    /// `lag_cols` order.
    pub fn lag_feature_names(&self) -> Vec<String> {
        self.lag_cols
            .iter()
            .map(|name| {
                self.lag_rename
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| format!("{name}{LAG_SUFFIX}"))
            })
            .collect()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.val_ratio.is_finite() || self.val_ratio <= 0.0 || self.val_ratio >= 1.0 {
            return Err(PrepError::Config(format!(
                "val_ratio must be in the open interval (0, 1), got {}",
                self.val_ratio
            )));
        }

        if self.target_col.is_empty() {
            return Err(PrepError::Config("target_col must not be empty".to_string()));
        }

        if self.include_lags {
            if self.lag_cols.is_empty() {
                return Err(PrepError::Config(
                    "lag_cols must not be empty when include_lags is set".to_string(),
                ));
            }
            for name in &self.lag_cols {
                match self.lag_rename.get(name) {
                    None => {
                        return Err(PrepError::Config(format!(
                            "lag column {name} has no rename entry"
                        )));
                    }
                    Some(renamed) if renamed == name => {
                        return Err(PrepError::Config(format!(
                            "lag column {name} must be renamed to a distinct name"
                        )));
                    }
                    Some(_) => {}
                }
            }
        }

        if self.output.train_file.is_empty() || self.output.holdout_file.is_empty() {
            return Err(PrepError::Config(
                "output file names must not be empty".to_string(),
            ));
        }
        if self.output.train_file == self.output.holdout_file {
            return Err(PrepError::Config(
                "training and holdout output files must differ".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| PrepError::Config(format!("TOML serialization failed: {e}")))?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Load configuration from a TOML file and validate it.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: PreprocessConfig = toml::from_str(&contents)
            .map_err(|e| PrepError::Config(format!("invalid TOML configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| PrepError::Config(format!("JSON serialization failed: {e}")))?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load configuration from a JSON file and validate it.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: PreprocessConfig = serde_json::from_str(&contents)
            .map_err(|e| PrepError::Config(format!("invalid JSON configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
