//! Nearest-cell index built once per grid and reused for many queries.

use rstar::RTree;
use tracing::debug;
use wind_common::{CellIndex, GridFingerprint, Location, RegularGrid};

use crate::cell::GridCell;
use crate::convention::LonConvention;
use crate::error::{Result, SpatialIndexError};

/// Distance ties within this squared tolerance resolve to the lowest
/// flat cell index, so repeat runs map the same location identically.
const TIE_EPSILON_2: f64 = 1e-12;

pub struct GridIndex {
    tree: RTree<GridCell>,
    convention: LonConvention,
    lon_count: usize,
    fingerprint: GridFingerprint,
}

impl GridIndex {
    /// Build an index over every cell of `grid`, plus ghost copies of
    /// the first and last longitude columns shifted by +-360 degrees
    /// to cover the seam of the axis.
    pub fn build(grid: &RegularGrid) -> Result<Self> {
        if grid.is_empty() {
            return Err(SpatialIndexError::EmptyGrid);
        }

        let convention = LonConvention::detect(grid);
        let lon_count = grid.lon_count();
        let last_lon_idx = lon_count - 1;

        let mut cells = Vec::with_capacity(grid.cell_count() + 2 * grid.lat_count());
        for (lat_idx, &lat) in grid.lats.iter().enumerate() {
            for (lon_idx, &lon) in grid.lons.iter().enumerate() {
                cells.push(GridCell::new(lat, lon, CellIndex::new(lat_idx, lon_idx)));
            }
            cells.push(GridCell::new(
                lat,
                grid.lons[0] + 360.0,
                CellIndex::new(lat_idx, 0),
            ));
            cells.push(GridCell::new(
                lat,
                grid.lons[last_lon_idx] - 360.0,
                CellIndex::new(lat_idx, last_lon_idx),
            ));
        }

        let tree = RTree::bulk_load(cells);
        debug!(
            lat = grid.lat_count(),
            lon = lon_count,
            convention = ?convention,
            "Built nearest-cell index"
        );

        Ok(Self {
            tree,
            convention,
            lon_count,
            fingerprint: grid.fingerprint(),
        })
    }

    /// The grid identity this index was built from. Analysis caches
    /// per-location cell indices keyed on this, and rebuilds only when
    /// a month carries different axes.
    pub fn fingerprint(&self) -> GridFingerprint {
        self.fingerprint
    }

    pub fn convention(&self) -> LonConvention {
        self.convention
    }

    /// Nearest cell to `location`. Ties resolve to the lowest flat
    /// cell index.
    pub fn query(&self, location: Location) -> Result<CellIndex> {
        if !location.latitude.is_finite() || !location.longitude.is_finite() {
            return Err(SpatialIndexError::InvalidLocation(location));
        }

        let point = [
            location.latitude,
            self.convention.normalize(location.longitude),
        ];

        let mut iter = self.tree.nearest_neighbor_iter_with_distance_2(&point);
        let (first, best_d2) = match iter.next() {
            Some(hit) => hit,
            // Build rejects empty grids, so the tree is never empty.
            None => return Err(SpatialIndexError::EmptyGrid),
        };

        let mut best = first.cell;
        let mut best_flat = best.lat_idx * self.lon_count + best.lon_idx;
        for (candidate, d2) in iter {
            if d2 > best_d2 + TIE_EPSILON_2 {
                break;
            }
            let flat = candidate.cell.lat_idx * self.lon_count + candidate.cell.lon_idx;
            if flat < best_flat {
                best = candidate.cell;
                best_flat = flat;
            }
        }
        Ok(best)
    }

    /// Map many locations in input order.
    pub fn query_batch(&self, locations: &[Location]) -> Result<Vec<CellIndex>> {
        locations.iter().map(|&loc| self.query(loc)).collect()
    }
}
