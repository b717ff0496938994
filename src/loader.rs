//! Dataset loading and label derivation.
//!
//! Builds the base lazy frame every later stage works on:
//!
//! 1. scan the raw Parquet dataset (file or directory),
//! 2. assign a zero-based `id` in scan order,
//! 3. derive `label = trunc(target * 2)` as a signed 32-bit integer,
//! 4. drop rows with `date_id <= start_dt`.
//!
//! The `id` column is assigned before the date filter, so surviving rows
//! keep their position in the *unfiltered* scan order (ids have gaps after
//! filtering). Determinism on date order is the caller's responsibility:
//! the input is expected to be sorted by `date_id` already.
//!
//! Everything here is lazy; a missing target column surfaces as a fatal
//! engine error at the first materialization.

use std::path::Path;

use polars::prelude::*;

use crate::config::PreprocessConfig;
use crate::error::Result;

/// Name of the derived row-identifier column.
pub const ID_COL: &str = "id";

/// Name of the derived label column.
pub const LABEL_COL: &str = "label";

/// Date column the pipeline orders and splits by.
pub const DATE_COL: &str = "date_id";

/// Symbol column rows are keyed by within a date.
pub const SYMBOL_COL: &str = "symbol_id";

/// Scan the raw dataset at `path` and apply id, label, and start-date
/// derivations.
///
/// `path` may be a single Parquet file or a directory; a directory is
/// scanned as `<dir>/*.parquet`.
pub fn scan_dataset(path: &Path, config: &PreprocessConfig) -> Result<LazyFrame> {
    let source = if path.is_dir() {
        path.join("*.parquet")
    } else {
        path.to_path_buf()
    };
    let lf = LazyFrame::scan_parquet(source, ScanArgsParquet::default())?;
    Ok(prepare_frame(lf, config))
}

/// Apply the loader derivations to an already-constructed lazy frame.
///
/// Split out from [`scan_dataset`] so the same semantics can be exercised
/// on in-memory frames.
pub fn prepare_frame(lf: LazyFrame, config: &PreprocessConfig) -> LazyFrame {
    lf.with_row_index(ID_COL, None)
        .with_column(
            (col(config.target_col.as_str()) * lit(2))
                .cast(DataType::Int32)
                .alias(LABEL_COL),
        )
        .filter(col(DATE_COL).gt(lit(config.start_dt)))
}
