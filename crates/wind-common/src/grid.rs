//! Regular lat/lon grid description shared by the wind-speed and
//! roughness datasets.

use serde::{Deserialize, Serialize};

/// An ordered pair of axes describing a regular latitude/longitude grid.
///
/// Flattened cell ordering is row-major:
/// `i = lat_idx * lon_count + lon_idx`. The axes are read-only once
/// loaded; stores created from a grid never resize its dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularGrid {
    /// Ordered latitudes (degrees north). Typically descending for
    /// reanalysis products; no ordering is assumed.
    pub lats: Vec<f64>,
    /// Ordered longitudes (degrees east), either 0..360 or -180..180.
    pub lons: Vec<f64>,
}

impl RegularGrid {
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Self {
        Self { lats, lons }
    }

    pub fn lat_count(&self) -> usize {
        self.lats.len()
    }

    pub fn lon_count(&self) -> usize {
        self.lons.len()
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.lats.len() * self.lons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lats.is_empty() || self.lons.is_empty()
    }

    /// Flatten a 2-D cell index.
    pub fn flat_index(&self, cell: CellIndex) -> usize {
        cell.lat_idx * self.lon_count() + cell.lon_idx
    }

    /// Split a flattened index back into (lat_idx, lon_idx).
    pub fn unflatten(&self, index: usize) -> CellIndex {
        CellIndex {
            lat_idx: index / self.lon_count(),
            lon_idx: index % self.lon_count(),
        }
    }

    /// Whether any longitude uses the signed (-180..180) convention.
    pub fn has_signed_longitudes(&self) -> bool {
        self.lons.iter().any(|&lon| lon < 0.0)
    }

    /// A cheap identity for caching derived artifacts (nearest-cell
    /// indices) per distinct grid. Two grids with identical axes
    /// produce identical fingerprints.
    pub fn fingerprint(&self) -> GridFingerprint {
        let corner_bits = |v: Option<&f64>| v.copied().unwrap_or(f64::NAN).to_bits();
        GridFingerprint {
            lat_count: self.lats.len(),
            lon_count: self.lons.len(),
            first_lat: corner_bits(self.lats.first()),
            last_lat: corner_bits(self.lats.last()),
            first_lon: corner_bits(self.lons.first()),
            last_lon: corner_bits(self.lons.last()),
        }
    }
}

/// Position of a cell within a [`RegularGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellIndex {
    pub lat_idx: usize,
    pub lon_idx: usize,
}

impl CellIndex {
    pub fn new(lat_idx: usize, lon_idx: usize) -> Self {
        Self { lat_idx, lon_idx }
    }
}

/// Hashable identity of a grid's axes, used as a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridFingerprint {
    lat_count: usize,
    lon_count: usize,
    first_lat: u64,
    last_lat: u64,
    first_lon: u64,
    last_lon: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x3() -> RegularGrid {
        RegularGrid::new(vec![10.0, 9.0], vec![0.0, 1.0, 2.0])
    }

    #[test]
    fn test_flat_index_roundtrip() {
        let grid = grid_2x3();
        for lat_idx in 0..2 {
            for lon_idx in 0..3 {
                let cell = CellIndex::new(lat_idx, lon_idx);
                assert_eq!(grid.unflatten(grid.flat_index(cell)), cell);
            }
        }
        assert_eq!(grid.flat_index(CellIndex::new(1, 2)), 5);
    }

    #[test]
    fn test_signed_longitude_detection() {
        assert!(!grid_2x3().has_signed_longitudes());
        let signed = RegularGrid::new(vec![0.0], vec![-180.0, 0.0, 179.0]);
        assert!(signed.has_signed_longitudes());
    }

    #[test]
    fn test_fingerprint_distinguishes_grids() {
        let a = grid_2x3();
        let b = RegularGrid::new(vec![10.0, 9.0], vec![0.0, 1.0, 2.5]);
        assert_eq!(a.fingerprint(), grid_2x3().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
