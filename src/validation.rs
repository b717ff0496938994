//! Output validation.
//!
//! Post-run checks on the preprocessed dataset, catching the failure modes
//! that silently corrupt downstream training:
//!
//! 1. **Lag key uniqueness**: exactly one lag row per `(date_id, symbol_id)`.
//! 2. **Partition order**: every training date precedes every holdout date.
//! 3. **Row preservation**: the lag merge never changes the row count.
//! 4. **Holdout size**: the realized holdout matches `floor(n * ratio)`,
//!    with a warning when ties at the cutoff shrank it.
//!
//! # Usage
//!
//! ```ignore
//! use market_preprocessor::validation::SplitValidator;
//!
//! let validator = SplitValidator::new();
//! let result = validator.validate_partitions(train, holdout)?;
//! if !result.is_valid() {
//!     for issue in result.errors() {
//!         eprintln!("{issue}");
//!     }
//! }
//! ```

use std::fmt;

use polars::prelude::*;

use crate::error::Result;
use crate::loader::{DATE_COL, SYMBOL_COL};
use crate::split::SplitSummary;

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    /// Check passed.
    Valid,
    /// Check passed with a caveat worth surfacing.
    Warning(String),
    /// Check failed.
    Error(String),
}

impl ValidationLevel {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationLevel::Valid)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationLevel::Warning(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ValidationLevel::Error(_))
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationLevel::Valid => write!(f, "Valid"),
            ValidationLevel::Warning(msg) => write!(f, "Warning: {msg}"),
            ValidationLevel::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// Aggregated result of named checks.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    results: Vec<(String, ValidationLevel)>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one named check.
    pub fn add(&mut self, check: impl Into<String>, level: ValidationLevel) {
        self.results.push((check.into(), level));
    }

    /// True when no check failed (warnings allowed).
    pub fn is_valid(&self) -> bool {
        !self.results.iter().any(|(_, level)| level.is_error())
    }

    /// Messages of all failed checks.
    pub fn errors(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|(_, level)| level.is_error())
            .map(|(name, level)| format!("{name}: {level}"))
            .collect()
    }

    /// Messages of all checks that passed with caveats.
    pub fn warnings(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|(_, level)| level.is_warning())
            .map(|(name, level)| format!("{name}: {level}"))
            .collect()
    }

    /// All recorded checks.
    pub fn checks(&self) -> &[(String, ValidationLevel)] {
        &self.results
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, level) in &self.results {
            writeln!(f, "[{level}] {name}")?;
        }
        Ok(())
    }
}

/// Validates the invariants of a preprocessed dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitValidator;

impl SplitValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check that the lag frame holds exactly one row per
    /// `(date_id, symbol_id)` key.
    pub fn check_lag_keys_unique(&self, lags: LazyFrame) -> Result<ValidationLevel> {
        let duplicates = lags
            .group_by([col(DATE_COL), col(SYMBOL_COL)])
            .agg([len().alias("key_count")])
            .filter(col("key_count").gt(lit(1)))
            .collect()?;

        if duplicates.height() == 0 {
            Ok(ValidationLevel::Valid)
        } else {
            Ok(ValidationLevel::Error(format!(
                "{} duplicate (date_id, symbol_id) keys in the lag frame",
                duplicates.height()
            )))
        }
    }

    /// Check that no date straddles the partition boundary:
    /// `max(training date) < min(holdout date)`.
    ///
    /// An empty holdout passes with a warning.
    pub fn check_partition_order(
        &self,
        training: LazyFrame,
        holdout: LazyFrame,
    ) -> Result<ValidationLevel> {
        let bounds = training
            .select([col(DATE_COL).max().alias("max_train")])
            .collect()?;
        let max_train = bounds
            .column("max_train")?
            .cast(&DataType::Int64)?
            .i64()?
            .get(0);

        let bounds = holdout
            .select([col(DATE_COL).min().alias("min_holdout")])
            .collect()?;
        let min_holdout = bounds
            .column("min_holdout")?
            .cast(&DataType::Int64)?
            .i64()?
            .get(0);

        match (max_train, min_holdout) {
            (_, None) => Ok(ValidationLevel::Warning(
                "holdout partition is empty".to_string(),
            )),
            (None, Some(_)) => Ok(ValidationLevel::Error(
                "training partition is empty".to_string(),
            )),
            (Some(max_t), Some(min_h)) if max_t < min_h => Ok(ValidationLevel::Valid),
            (Some(max_t), Some(min_h)) => Ok(ValidationLevel::Error(format!(
                "date {max_t} in training overlaps holdout starting at {min_h}"
            ))),
        }
    }

    /// Check that the merge preserved the row count.
    pub fn check_row_preservation(
        &self,
        before: LazyFrame,
        after: LazyFrame,
    ) -> Result<ValidationLevel> {
        let rows_before = frame_len(before)?;
        let rows_after = frame_len(after)?;
        if rows_before == rows_after {
            Ok(ValidationLevel::Valid)
        } else {
            Ok(ValidationLevel::Error(format!(
                "merge changed row count from {rows_before} to {rows_after}"
            )))
        }
    }

    /// Check the realized holdout size against `floor(n * ratio)`.
    pub fn check_holdout_size(&self, summary: &SplitSummary, ratio: f64) -> ValidationLevel {
        let expected = (summary.total_rows as f64 * ratio).floor() as usize;
        if summary.holdout_rows == expected {
            ValidationLevel::Valid
        } else if summary.holdout_rows < expected {
            ValidationLevel::Warning(format!(
                "holdout has {} rows, {} requested (ties at date {} stayed in training)",
                summary.holdout_rows, expected, summary.cutoff_date
            ))
        } else {
            ValidationLevel::Error(format!(
                "holdout has {} rows but only {} were requested",
                summary.holdout_rows, expected
            ))
        }
    }

    /// Run every applicable check for one pipeline run.
    ///
    /// `lags` and `merge` are `None` when lag construction was disabled;
    /// `merge` carries the pre-merge and post-merge frames for the
    /// row-preservation check.
    pub fn validate_run(
        &self,
        lags: Option<LazyFrame>,
        merge: Option<(LazyFrame, LazyFrame)>,
        training: LazyFrame,
        holdout: LazyFrame,
        summary: &SplitSummary,
        ratio: f64,
    ) -> Result<ValidationResult> {
        let mut result = ValidationResult::new();

        if let Some(lags) = lags {
            result.add("lag_key_uniqueness", self.check_lag_keys_unique(lags)?);
        }
        if let Some((before, after)) = merge {
            result.add(
                "merge_row_preservation",
                self.check_row_preservation(before, after)?,
            );
        }
        result.add(
            "partition_order",
            self.check_partition_order(training, holdout)?,
        );
        result.add("holdout_size", self.check_holdout_size(summary, ratio));

        Ok(result)
    }
}

/// Materialized row count of a lazy frame.
fn frame_len(lf: LazyFrame) -> Result<usize> {
    let counted = lf.select([len().alias("n")]).collect()?;
    let n = counted
        .column("n")?
        .cast(&DataType::UInt64)?
        .u64()?
        .get(0)
        .unwrap_or(0);
    Ok(n as usize)
}
