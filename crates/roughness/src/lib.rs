//! Surface roughness length (z0) lookup for height adjustment.
//!
//! Roughness grids live beside the wind-speed stores as Zarr groups
//! named `YYYY-MM_roughness.zarr`. Their lat/lon axes are their own,
//! usually coarser than the wind grids; callers resolve locations to
//! cells over those axes. Lookup falls back in three tiers:
//!
//! 1. the exact `(year, month)` grid's value for the cell,
//! 2. the cell's long-term average over all stored grids, covering
//!    invalid cells and whole missing months alike,
//! 3. a uniform default roughness length.

pub mod error;
pub mod field;
pub mod provider;
pub mod store;

pub use error::{Result, RoughnessError};
pub use field::RoughnessField;
pub use provider::{ConstantRoughness, MonthlyRoughnessProvider, RoughnessSource};
pub use store::{read_roughness_grid, roughness_path, write_roughness_grid};

/// Roughness length used when no grid covers a month and no average
/// can be formed, in meters. Open grassland.
pub const DEFAULT_Z0: f64 = 0.03;
