//! Error types for the availability analysis.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error(transparent)]
    GridStore(#[from] grid_store::GridStoreError),

    #[error(transparent)]
    Spatial(#[from] spatial_index::SpatialIndexError),

    #[error(transparent)]
    Roughness(#[from] roughness::RoughnessError),

    #[error("invalid analysis configuration: {0}")]
    Config(String),

    /// The run was cancelled between chunks; partial counters are
    /// discarded.
    #[error("analysis cancelled")]
    Cancelled,

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
