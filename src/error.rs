//! Crate-wide error type.
//!
//! The preprocessor is a single-shot batch job: every error is fatal and
//! surfaces immediately. Configuration problems are reported before any
//! work starts; data and I/O problems propagate from the query engine or
//! the filesystem at materialization time.

use std::fmt;
use std::io;

use polars::error::PolarsError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Error type for preprocessing operations.
#[derive(Debug)]
pub enum PrepError {
    /// Invalid configuration (bad column names, ratio out of range, ...).
    Config(String),

    /// Invalid data (empty dataset, degenerate split, ...).
    Data(String),

    /// Error raised by the underlying query engine.
    Polars(PolarsError),

    /// Filesystem error while persisting output.
    Io(io::Error),
}

impl fmt::Display for PrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Data(msg) => write!(f, "data error: {msg}"),
            Self::Polars(err) => write!(f, "query engine error: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for PrepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Polars(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PolarsError> for PrepError {
    fn from(err: PolarsError) -> Self {
        Self::Polars(err)
    }
}

impl From<io::Error> for PrepError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
