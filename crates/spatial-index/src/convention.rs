//! Longitude convention detection and normalization.

use wind_common::RegularGrid;

/// The longitude range a grid's axis is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LonConvention {
    /// Longitudes in `[-180, 180)`.
    Signed180,
    /// Longitudes in `[0, 360)`.
    ZeroTo360,
}

impl LonConvention {
    /// Detect the convention from a grid's axis. Any negative
    /// longitude means the signed convention; an axis entirely within
    /// `[0, 180]` is valid under both and is treated as 0..360.
    pub fn detect(grid: &RegularGrid) -> Self {
        if grid.has_signed_longitudes() {
            Self::Signed180
        } else {
            Self::ZeroTo360
        }
    }

    /// Map an arbitrary longitude into this convention's range.
    pub fn normalize(&self, lon: f64) -> f64 {
        match self {
            Self::ZeroTo360 => lon.rem_euclid(360.0),
            Self::Signed180 => (lon + 180.0).rem_euclid(360.0) - 180.0,
        }
    }
}
