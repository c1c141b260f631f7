//! Nearest-cell lookup over a regular lat/lon grid.
//!
//! Grid cells are indexed in an R-tree. Query longitudes are first
//! normalized into the grid's own convention (0..360 or -180..180),
//! and the first and last longitude columns are additionally indexed
//! as ghost copies shifted by +-360 degrees, so a query near the
//! antimeridian or prime-meridian seam resolves to the column that is
//! geodesically closest rather than the far edge of the axis.

pub mod cell;
pub mod convention;
pub mod error;
pub mod index;

pub use cell::GridCell;
pub use convention::LonConvention;
pub use error::{Result, SpatialIndexError};
pub use index::GridIndex;
