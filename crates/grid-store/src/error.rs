//! Error types for the grid store.

use thiserror::Error;
use wind_common::{TimeKey, TimeKeyError};

/// Errors that can occur while creating, writing, or reading monthly grids.
#[derive(Error, Debug)]
pub enum GridStoreError {
    /// Failed to create a new grid store on disk.
    #[error("failed to create grid store: {0}")]
    CreateFailed(String),

    /// Failed to open an existing grid store.
    #[error("failed to open grid store: {0}")]
    OpenFailed(String),

    /// A supplied field does not match the grid's fixed lat/lon dims.
    /// Fatal to the offending timestep only.
    #[error(
        "field has {actual} cells, grid is fixed at {expected_lat}x{expected_lon}"
    )]
    ShapeMismatch {
        expected_lat: usize,
        expected_lon: usize,
        actual: usize,
    },

    /// An append would break the monotonic ordering of the time axis.
    /// Callers must present batches sorted by (date, step).
    #[error("timestep {key} sorts before last stored key {last}")]
    OutOfOrder { key: TimeKey, last: TimeKey },

    /// The on-disk grid is structurally inconsistent. Fatal to that
    /// file only; sibling months are unaffected.
    #[error("corrupt grid file: {0}")]
    CorruptGrid(String),

    /// U and V fields disagree in length.
    #[error("component fields disagree in length: u={u_len}, v={v_len}")]
    ComponentLengthMismatch { u_len: usize, v_len: usize },

    /// Requested time range is outside the stored axis.
    #[error("time range [{start}, {start_plus_len}) outside stored length {stored}")]
    TimeRangeOutOfBounds {
        start: usize,
        start_plus_len: usize,
        stored: usize,
    },

    /// Zarr storage/codec error.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Invalid store configuration.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A persisted time value could not be decoded.
    #[error(transparent)]
    InvalidTimeKey(#[from] TimeKeyError),

    /// Filesystem error (ledger, store directories).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GridStoreError {
    pub fn create_failed(msg: impl Into<String>) -> Self {
        Self::CreateFailed(msg.into())
    }

    pub fn open_failed(msg: impl Into<String>) -> Self {
        Self::OpenFailed(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptGrid(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }
}

/// Result type for grid store operations.
pub type Result<T> = std::result::Result<T, GridStoreError>;
