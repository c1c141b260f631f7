//! Common types and utilities shared across the wind-availability workspace.

pub mod cancel;
pub mod grid;
pub mod location;
pub mod time;

pub use cancel::CancelFlag;
pub use grid::{CellIndex, GridFingerprint, RegularGrid};
pub use location::Location;
pub use time::{MonthKey, TimeKey, TimeKeyError};

/// Sentinel marking an invalid/missing cell in stored wind-speed grids.
///
/// Large-magnitude negative so it can never collide with a physically
/// valid speed.
pub const FILL_VALUE: f32 = -9999.0;

/// Default missing-value sentinel carried by raw component fields.
pub const DEFAULT_MISSING_SENTINEL: f32 = 9999.0;
