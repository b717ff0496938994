//! Preprocessing pipeline.
//!
//! Connects the stages into one strictly ordered, single-shot run:
//!
//! ```text
//! Parquet dataset → Loader → Lag Builder → Merger → Splitter → persist
//!                              (skipped when include_lags is off)
//! ```
//!
//! Every stage is lazy; materialization happens at the splitter's row
//! count and at the final write. A run either completes all stages or
//! aborts with no output: both partitions are written to temporary paths
//! and renamed into place only after both writes succeed.
//!
//! # Example
//!
//! ```ignore
//! use market_preprocessor::prelude::*;
//!
//! let pipeline = PipelineBuilder::new()
//!     .val_ratio(0.1)
//!     .start_date(1400)
//!     .output_dir("preprocessed_data")
//!     .build()?;
//!
//! let output = pipeline.run(Path::new("raw_data/train_parquet"))?;
//! println!("cutoff date {}", output.cutoff_date);
//! ```

use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use polars::prelude::*;

use crate::config::PreprocessConfig;
use crate::error::{PrepError, Result};
use crate::lags::{build_lags, merge_lags};
use crate::loader::scan_dataset;
use crate::split::ChronoSplitter;
use crate::validation::SplitValidator;

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Rows surviving the start-date filter.
    pub total_rows: usize,

    /// Rows written to the training partition.
    pub train_rows: usize,

    /// Rows written to the holdout partition.
    pub holdout_rows: usize,

    /// Last date included in the training partition.
    pub cutoff_date: i64,

    /// Path of the persisted training file.
    pub train_path: PathBuf,

    /// Path of the persisted holdout file.
    pub holdout_path: PathBuf,
}

/// The preprocessing pipeline.
///
/// Construction validates the configuration; [`Pipeline::run`] performs
/// one complete load → lag → merge → split → persist pass.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PreprocessConfig,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: PreprocessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a pipeline from a TOML configuration file.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            config: PreprocessConfig::load_toml(path)?,
        })
    }

    /// The pipeline's configuration.
    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Run the full pipeline on the dataset at `input`.
    pub fn run(&self, input: &Path) -> Result<PipelineOutput> {
        info!("scanning dataset at {}", input.display());
        let base = scan_dataset(input, &self.config)?;

        let (merged, lags, pre_merge) = if self.config.include_lags {
            debug!(
                "building lag features for {} responder columns",
                self.config.lag_cols.len()
            );
            let lags = build_lags(base.clone(), &self.config);
            let merged = merge_lags(base.clone(), lags.clone());
            (merged, Some(lags), Some(base))
        } else {
            debug!("lag construction disabled, passing dataset through");
            (base, None, None)
        };

        let splitter = ChronoSplitter::new(self.config.val_ratio)?;
        let (training, holdout, summary) = splitter.split(merged.clone())?;
        info!(
            "split {} rows at date {}: {} training / {} holdout",
            summary.total_rows, summary.cutoff_date, summary.train_rows, summary.holdout_rows
        );

        let (train_path, holdout_path) =
            self.persist(training.clone(), holdout.clone())?;

        if self.config.validate_output {
            let validator = SplitValidator::new();
            let merge = pre_merge.map(|before| (before, merged));
            let result = validator.validate_run(
                lags,
                merge,
                training,
                holdout,
                &summary,
                self.config.val_ratio,
            )?;
            for warning in result.warnings() {
                warn!("{warning}");
            }
            if !result.is_valid() {
                return Err(PrepError::Data(format!(
                    "output validation failed: {}",
                    result.errors().join("; ")
                )));
            }
        }

        Ok(PipelineOutput {
            total_rows: summary.total_rows,
            train_rows: summary.train_rows,
            holdout_rows: summary.holdout_rows,
            cutoff_date: summary.cutoff_date,
            train_path,
            holdout_path,
        })
    }

    /// Materialize and write both partitions atomically.
    ///
    /// Each frame is written to a `.tmp` sibling first; the temporary
    /// files are renamed to their final names only after both writes
    /// succeed, so a failed run leaves no partial output behind.
    fn persist(&self, training: LazyFrame, holdout: LazyFrame) -> Result<(PathBuf, PathBuf)> {
        let out = &self.config.output;
        fs::create_dir_all(&out.dir)?;

        let train_path = out.dir.join(&out.train_file);
        let holdout_path = out.dir.join(&out.holdout_file);
        let train_tmp = tmp_sibling(&train_path);
        let holdout_tmp = tmp_sibling(&holdout_path);

        write_parquet(training, &train_tmp)?;
        if let Err(err) = write_parquet(holdout, &holdout_tmp) {
            let _ = fs::remove_file(&train_tmp);
            return Err(err);
        }

        fs::rename(&train_tmp, &train_path)?;
        if let Err(err) = fs::rename(&holdout_tmp, &holdout_path) {
            let _ = fs::remove_file(&holdout_tmp);
            return Err(err.into());
        }

        info!(
            "wrote {} and {}",
            train_path.display(),
            holdout_path.display()
        );
        Ok((train_path, holdout_path))
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_parquet(frame: LazyFrame, path: &Path) -> Result<()> {
    let mut df = frame.collect()?;
    let mut file = File::create(path)?;
    ParquetWriter::new(&mut file).finish(&mut df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = PreprocessConfig::default().with_val_ratio(1.5);
        assert!(Pipeline::new(config).is_err());
    }

    #[test]
    fn test_tmp_sibling_names() {
        let path = Path::new("out/training.parquet");
        assert_eq!(
            tmp_sibling(path),
            PathBuf::from("out/training.parquet.tmp")
        );
    }
}
