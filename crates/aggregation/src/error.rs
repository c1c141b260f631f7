//! Error types for the aggregation pipeline.

use thiserror::Error;
use wind_common::TimeKeyError;

#[derive(Error, Debug)]
pub enum AggregationError {
    /// An archive file could not be read or decoded.
    #[error("archive error in {path}: {message}")]
    Archive { path: String, message: String },

    /// The archive root is missing or not a directory.
    #[error("invalid archive root: {0}")]
    InvalidArchiveRoot(String),

    #[error(transparent)]
    GridStore(#[from] grid_store::GridStoreError),

    #[error(transparent)]
    InvalidTimeKey(#[from] TimeKeyError),

    /// A spawned month worker panicked or was cancelled by the runtime.
    #[error("month worker failed: {0}")]
    Worker(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AggregationError {
    pub fn archive(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AggregationError>;
