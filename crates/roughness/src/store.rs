//! On-disk Zarr layout for monthly roughness grids.
//!
//! `YYYY-MM_roughness.zarr/` holds `lat` and `lon` 1-D f32 axes and a
//! 2-D f32 `z0` array in `(lat, lon)` order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use zarrs::array::{Array, ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs::group::GroupBuilder;
use zarrs_filesystem::FilesystemStore;

use wind_common::{MonthKey, RegularGrid};

use crate::error::{Result, RoughnessError};

/// On-disk location of the roughness grid for a month under `root`.
pub fn roughness_path(root: &Path, month: MonthKey) -> PathBuf {
    root.join(format!("{}_roughness.zarr", month.label()))
}

/// Read a monthly roughness grid, returning its axes and the z0 field
/// flattened row-major.
pub fn read_roughness_grid(path: &Path) -> Result<(RegularGrid, Vec<f64>)> {
    let store = Arc::new(
        FilesystemStore::new(path).map_err(|e| RoughnessError::open_failed(e.to_string()))?,
    );

    let lat = Array::open(store.clone(), "/lat")
        .map_err(|e| RoughnessError::corrupt(format!("missing lat array: {e}")))?;
    let lon = Array::open(store.clone(), "/lon")
        .map_err(|e| RoughnessError::corrupt(format!("missing lon array: {e}")))?;
    let z0 = Array::open(store, "/z0")
        .map_err(|e| RoughnessError::corrupt(format!("missing z0 array: {e}")))?;

    let lats = read_axis(&lat, "lat")?;
    let lons = read_axis(&lon, "lon")?;
    let grid = RegularGrid::new(lats, lons);
    if grid.is_empty() {
        return Err(RoughnessError::corrupt("empty lat/lon axes"));
    }

    let shape = z0.shape().to_vec();
    let expected = vec![grid.lat_count() as u64, grid.lon_count() as u64];
    if shape != expected {
        return Err(RoughnessError::corrupt(format!(
            "z0 shape {shape:?} does not match axes {expected:?}"
        )));
    }

    let subset = ArraySubset::new_with_start_shape(vec![0, 0], expected)
        .map_err(|e| RoughnessError::storage(e.to_string()))?;
    let values: Vec<f32> = z0
        .retrieve_array_subset_elements(&subset)
        .map_err(|e| RoughnessError::corrupt(format!("cannot read z0: {e}")))?;

    Ok((grid, values.into_iter().map(|v| v as f64).collect()))
}

/// Write a monthly roughness grid. Used by fixtures and by tooling
/// that imports roughness products.
pub fn write_roughness_grid(path: &Path, grid: &RegularGrid, values: &[f32]) -> Result<()> {
    if values.len() != grid.cell_count() {
        return Err(RoughnessError::corrupt(format!(
            "z0 field has {} cells, axes describe {}",
            values.len(),
            grid.cell_count()
        )));
    }

    std::fs::create_dir_all(path)?;
    let store = Arc::new(
        FilesystemStore::new(path).map_err(|e| RoughnessError::storage(e.to_string()))?,
    );
    let group = GroupBuilder::new()
        .build(store.clone(), "/")
        .map_err(|e| RoughnessError::storage(e.to_string()))?;
    group
        .store_metadata()
        .map_err(|e| RoughnessError::storage(e.to_string()))?;

    let nlat = grid.lat_count() as u64;
    let nlon = grid.lon_count() as u64;

    let lat_values: Vec<f32> = grid.lats.iter().map(|&v| v as f32).collect();
    write_1d(store.clone(), "/lat", &lat_values)?;
    let lon_values: Vec<f32> = grid.lons.iter().map(|&v| v as f32).collect();
    write_1d(store.clone(), "/lon", &lon_values)?;

    let chunk_grid: zarrs::array::ChunkGrid = vec![nlat, nlon]
        .try_into()
        .map_err(|e| RoughnessError::storage(format!("{e:?}")))?;
    let array = ArrayBuilder::new(
        vec![nlat, nlon],
        DataType::Float32,
        chunk_grid,
        FillValue::from(f32::NAN),
    )
    .build(store, "/z0")
    .map_err(|e| RoughnessError::storage(e.to_string()))?;
    array
        .store_metadata()
        .map_err(|e| RoughnessError::storage(e.to_string()))?;
    let subset = ArraySubset::new_with_start_shape(vec![0, 0], vec![nlat, nlon])
        .map_err(|e| RoughnessError::storage(e.to_string()))?;
    array
        .store_array_subset_elements(&subset, values)
        .map_err(|e| RoughnessError::storage(e.to_string()))?;
    Ok(())
}

fn write_1d(store: Arc<FilesystemStore>, path: &str, values: &[f32]) -> Result<()> {
    let len = values.len() as u64;
    let chunk_grid: zarrs::array::ChunkGrid = vec![len]
        .try_into()
        .map_err(|e| RoughnessError::storage(format!("{e:?}")))?;
    let array = ArrayBuilder::new(
        vec![len],
        DataType::Float32,
        chunk_grid,
        FillValue::from(f32::NAN),
    )
    .build(store, path)
    .map_err(|e| RoughnessError::storage(e.to_string()))?;
    array
        .store_metadata()
        .map_err(|e| RoughnessError::storage(e.to_string()))?;
    let subset = ArraySubset::new_with_start_shape(vec![0], vec![len])
        .map_err(|e| RoughnessError::storage(e.to_string()))?;
    array
        .store_array_subset_elements(&subset, values)
        .map_err(|e| RoughnessError::storage(e.to_string()))
}

fn read_axis(array: &Array<FilesystemStore>, name: &str) -> Result<Vec<f64>> {
    let shape = array.shape().to_vec();
    if shape.len() != 1 {
        return Err(RoughnessError::corrupt(format!("{name} array is not 1-D")));
    }
    let subset = ArraySubset::new_with_start_shape(vec![0], vec![shape[0]])
        .map_err(|e| RoughnessError::storage(e.to_string()))?;
    let values: Vec<f32> = array
        .retrieve_array_subset_elements(&subset)
        .map_err(|e| RoughnessError::corrupt(format!("cannot read {name} axis: {e}")))?;
    Ok(values.into_iter().map(|v| v as f64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let month = MonthKey::new(2002, 6);
        let grid = RegularGrid::new(vec![50.0, 49.75], vec![10.0, 10.25]);
        let values = vec![0.1_f32, 0.2, 0.3, 0.4];

        let path = roughness_path(dir.path(), month);
        write_roughness_grid(&path, &grid, &values).unwrap();

        let (read_grid, read_values) = read_roughness_grid(&path).unwrap();
        assert_eq!(read_grid, grid);
        let expected: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        assert_eq!(read_values, expected);
    }

    #[test]
    fn test_wrong_cell_count_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let grid = RegularGrid::new(vec![50.0], vec![10.0, 10.25]);
        let err = write_roughness_grid(&dir.path().join("bad.zarr"), &grid, &[0.1]).unwrap_err();
        assert!(matches!(err, RoughnessError::Corrupt(_)));
    }
}
