//! Fluent builder for pipeline configuration.
//!
//! Thin layer over [`PreprocessConfig`] for constructing pipelines in a
//! readable, chainable way. The built configuration is validated before
//! the pipeline is returned.
//!
//! # Example
//!
//! ```ignore
//! use market_preprocessor::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new()
//!     .val_ratio(0.1)
//!     .start_date(1400)
//!     .output_dir("preprocessed_data")
//!     .holdout_name("testing.parquet")
//!     .build()?;
//! ```

use std::path::PathBuf;

use crate::config::PreprocessConfig;
use crate::error::Result;
use crate::pipeline::Pipeline;

/// Builder for [`Pipeline`].
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    config: PreprocessConfig,
}

impl PipelineBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Target holdout fraction, in (0, 1).
    pub fn val_ratio(mut self, ratio: f64) -> Self {
        self.config.val_ratio = ratio;
        self
    }

    /// Drop rows with `date_id <= start_dt`.
    pub fn start_date(mut self, start_dt: i64) -> Self {
        self.config.start_dt = start_dt;
        self
    }

    /// Column the label is derived from.
    pub fn target_col(mut self, name: impl Into<String>) -> Self {
        self.config.target_col = name.into();
        self
    }

    /// Skip lag construction and merging entirely.
    pub fn without_lags(mut self) -> Self {
        self.config.include_lags = false;
        self
    }

    /// Directory the output files are written into.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output.dir = dir.into();
        self
    }

    /// File name of the training partition.
    pub fn train_name(mut self, name: impl Into<String>) -> Self {
        self.config.output.train_file = name.into();
        self
    }

    /// File name of the holdout partition (e.g. `validation.parquet` or
    /// `testing.parquet`).
    pub fn holdout_name(mut self, name: impl Into<String>) -> Self {
        self.config.output.holdout_file = name.into();
        self
    }

    /// Run leakage and uniqueness checks after persisting.
    pub fn validate_output(mut self) -> Self {
        self.config.validate_output = true;
        self
    }

    /// Finish and return the configuration without building a pipeline.
    pub fn build_config(self) -> Result<PreprocessConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Validate the configuration and build the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        Pipeline::new(self.config)
    }
}
