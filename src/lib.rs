//! Market Preprocessor
//!
//! Leakage-safe dataset preparation for tabular market time-series:
//! lag-feature construction and chronological train/holdout splitting over
//! columnar (Parquet) data, built on the polars lazy engine.
//!
//! # Overview
//!
//! The raw dataset is one row per `(date_id, symbol_id)` observation with
//! nine responder measurements. The preprocessor derives a label from the
//! target responder, attaches each symbol's previous-date responder vector
//! as `responder_k_lag_1` columns, and splits the result at a date cutoff
//! so that no date straddles the train/holdout boundary.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Market Preprocessor                       │
//! ├───────────────────────────────────────────────────────────────┤
//! │  config/     - Run configuration (TOML/JSON, validated)       │
//! │  loader/     - Parquet scan, row ids, label, date filter      │
//! │  lags/       - Lag projection, +1 shift, last-per-key         │
//! │  split/      - Date-cutoff chronological partitioning         │
//! │  pipeline/   - Stage composition and atomic persistence       │
//! │  validation/ - Post-run leakage and uniqueness checks         │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! All stages are lazy until the splitter's row count and the final write
//! force materialization; a run either completes or leaves no output.
//!
//! # Example
//!
//! ```ignore
//! use market_preprocessor::prelude::*;
//! use std::path::Path;
//!
//! let pipeline = PipelineBuilder::new()
//!     .val_ratio(0.1)
//!     .start_date(1400)
//!     .build()?;
//!
//! let output = pipeline.run(Path::new("raw_data/train_parquet"))?;
//! println!(
//!     "{} training rows, {} holdout rows, cutoff date {}",
//!     output.train_rows, output.holdout_rows, output.cutoff_date
//! );
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod lags;
pub mod loader;
pub mod pipeline;
pub mod prelude;
pub mod split;
pub mod validation;

// Re-exports - Configuration
pub use config::{OutputConfig, PreprocessConfig};

// Re-exports - Errors
pub use error::{PrepError, Result};

// Re-exports - Pipeline
pub use builder::PipelineBuilder;
pub use pipeline::{Pipeline, PipelineOutput};

// Re-exports - Stages
pub use lags::{build_lags, merge_lags};
pub use loader::{prepare_frame, scan_dataset};
pub use split::{ChronoSplitter, SplitSummary};

// Re-exports - Validation
pub use validation::{SplitValidator, ValidationLevel, ValidationResult};
