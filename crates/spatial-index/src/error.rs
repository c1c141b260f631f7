//! Error types for spatial indexing.

use thiserror::Error;
use wind_common::Location;

#[derive(Error, Debug)]
pub enum SpatialIndexError {
    /// An index cannot be built over a grid with no cells.
    #[error("cannot index an empty grid")]
    EmptyGrid,

    /// A query location carries a non-finite coordinate.
    #[error("location {0} has a non-finite coordinate")]
    InvalidLocation(Location),
}

pub type Result<T> = std::result::Result<T, SpatialIndexError>;
