//! Generators for synthetic grids and wind fields.

use wind_common::{RegularGrid, DEFAULT_MISSING_SENTINEL};

/// A regular grid starting at `(lat0, lon0)` with `step`-degree
/// spacing, latitudes descending and longitudes ascending, matching
/// the layout of typical reanalysis products.
pub fn regular_grid(lat0: f64, lon0: f64, step: f64, nlat: usize, nlon: usize) -> RegularGrid {
    let lats: Vec<f64> = (0..nlat).map(|i| lat0 - step * i as f64).collect();
    let lons: Vec<f64> = (0..nlon).map(|i| lon0 + step * i as f64).collect();
    RegularGrid::new(lats, lons)
}

/// A field where every cell carries the same value.
pub fn uniform_field(grid: &RegularGrid, value: f32) -> Vec<f32> {
    vec![value; grid.cell_count()]
}

/// A field with predictable per-cell values: cell `i` carries
/// `base + i`, so reads can be checked positionally.
pub fn indexed_field(grid: &RegularGrid, base: f32) -> Vec<f32> {
    (0..grid.cell_count()).map(|i| base + i as f32).collect()
}

/// A uniform field with the missing sentinel punched into the given
/// flat cell indices.
pub fn field_with_holes(grid: &RegularGrid, value: f32, holes: &[usize]) -> Vec<f32> {
    let mut field = uniform_field(grid, value);
    for &hole in holes {
        field[hole] = DEFAULT_MISSING_SENTINEL;
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_grid_axes() {
        let grid = regular_grid(52.0, 0.0, 0.25, 3, 4);
        assert_eq!(grid.lats, vec![52.0, 51.75, 51.5]);
        assert_eq!(grid.lons, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_field_with_holes() {
        let grid = regular_grid(52.0, 0.0, 0.25, 1, 3);
        let field = field_with_holes(&grid, 7.0, &[1]);
        assert_eq!(field, vec![7.0, DEFAULT_MISSING_SENTINEL, 7.0]);
    }
}
