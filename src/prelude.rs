//! Prelude module for convenient imports.
//!
//! ```ignore
//! use market_preprocessor::prelude::*;
//!
//! let pipeline = PipelineBuilder::new().build()?;
//! let output = pipeline.run(Path::new("raw_data/train_parquet"))?;
//! ```

pub use crate::builder::PipelineBuilder;
pub use crate::config::{OutputConfig, PreprocessConfig};
pub use crate::error::{PrepError, Result};
pub use crate::lags::{build_lags, merge_lags};
pub use crate::loader::{prepare_frame, scan_dataset};
pub use crate::pipeline::{Pipeline, PipelineOutput};
pub use crate::split::{ChronoSplitter, SplitSummary};
pub use crate::validation::{SplitValidator, ValidationLevel, ValidationResult};
