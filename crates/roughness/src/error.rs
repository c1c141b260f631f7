//! Error types for roughness grids.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoughnessError {
    /// Failed to open a roughness grid on disk.
    #[error("failed to open roughness grid: {0}")]
    OpenFailed(String),

    /// The on-disk grid is structurally inconsistent.
    #[error("corrupt roughness grid: {0}")]
    Corrupt(String),

    /// Zarr storage error.
    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RoughnessError {
    pub fn open_failed(msg: impl Into<String>) -> Self {
        Self::OpenFailed(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RoughnessError>;
