//! Monthly wind-speed grid store backed by Zarr V3.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};
use zarrs::array::codec::bytes_to_bytes::blosc::{
    BloscCodec, BloscCompressionLevel, BloscCompressor, BloscShuffleMode,
};
use zarrs::array::{Array, ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs::group::GroupBuilder;
use zarrs_filesystem::FilesystemStore;

use wind_common::{MonthKey, RegularGrid, TimeKey, FILL_VALUE};

use crate::config::{Compression, GridStoreConfig};
use crate::error::{GridStoreError, Result};

/// Outcome of an append attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The timestep was written as the next time index.
    Appended,
    /// The time key was already stored; nothing was written.
    SkippedDuplicate,
}

/// One persistent `(year, month)` wind-speed grid.
///
/// Exclusive-write discipline: a store must never be open for write by
/// more than one worker at a time. The aggregation pipeline enforces
/// this by partitioning months across workers; concurrent read-only
/// opens of distinct months are safe.
pub struct MonthlyGridStore {
    month: MonthKey,
    path: PathBuf,
    grid: RegularGrid,
    keys: Vec<TimeKey>,
    key_set: HashSet<TimeKey>,
    time: Array<FilesystemStore>,
    wind_speed: Array<FilesystemStore>,
}

impl MonthlyGridStore {
    /// On-disk location of the store for a month under `root`.
    pub fn store_path(root: &Path, month: MonthKey) -> PathBuf {
        root.join(format!("{}_wind_speed.zarr", month.label()))
    }

    /// Whether a store for this month exists under `root`.
    pub fn exists(root: &Path, month: MonthKey) -> bool {
        Self::store_path(root, month).is_dir()
    }

    /// Open the store for `month` if it exists, otherwise create one
    /// with axes from `shape_hint` (taken from the first complete
    /// sample of the month).
    pub fn open_or_create(
        root: &Path,
        month: MonthKey,
        shape_hint: &RegularGrid,
        config: &GridStoreConfig,
    ) -> Result<Self> {
        if Self::exists(root, month) {
            Self::open(root, month)
        } else {
            Self::create(root, month, shape_hint, config)
        }
    }

    /// Open an existing store read-back for appends or analysis.
    pub fn open(root: &Path, month: MonthKey) -> Result<Self> {
        let path = Self::store_path(root, month);
        let store = Arc::new(
            FilesystemStore::new(&path)
                .map_err(|e| GridStoreError::open_failed(e.to_string()))?,
        );

        let time = Array::open(store.clone(), "/time")
            .map_err(|e| GridStoreError::corrupt(format!("missing time array: {e}")))?;
        let lat = Array::open(store.clone(), "/lat")
            .map_err(|e| GridStoreError::corrupt(format!("missing lat array: {e}")))?;
        let lon = Array::open(store.clone(), "/lon")
            .map_err(|e| GridStoreError::corrupt(format!("missing lon array: {e}")))?;
        let wind_speed = Array::open(store, "/wind_speed")
            .map_err(|e| GridStoreError::corrupt(format!("missing wind_speed array: {e}")))?;

        let lats = read_axis(&lat, "lat")?;
        let lons = read_axis(&lon, "lon")?;
        let grid = RegularGrid::new(lats, lons);
        if grid.is_empty() {
            return Err(GridStoreError::corrupt("empty lat/lon axes"));
        }

        let time_shape = time.shape().to_vec();
        if time_shape.len() != 1 {
            return Err(GridStoreError::corrupt("time array is not 1-D"));
        }
        let time_len = time_shape[0];

        let ws_shape = wind_speed.shape().to_vec();
        let expected = vec![time_len, grid.lat_count() as u64, grid.lon_count() as u64];
        if ws_shape != expected {
            return Err(GridStoreError::corrupt(format!(
                "wind_speed shape {ws_shape:?} does not match time/lat/lon {expected:?}"
            )));
        }

        let keys = read_time_keys(&time, time_len as usize)?;
        let key_set: HashSet<TimeKey> = keys.iter().copied().collect();

        debug!(
            month = %month,
            timesteps = keys.len(),
            lat = grid.lat_count(),
            lon = grid.lon_count(),
            "Opened monthly grid store"
        );

        Ok(Self {
            month,
            path,
            grid,
            keys,
            key_set,
            time,
            wind_speed,
        })
    }

    /// Create a fresh store with fixed lat/lon axes and an empty time
    /// dimension.
    fn create(
        root: &Path,
        month: MonthKey,
        shape_hint: &RegularGrid,
        config: &GridStoreConfig,
    ) -> Result<Self> {
        if shape_hint.is_empty() {
            return Err(GridStoreError::create_failed("grid axes must be non-empty"));
        }
        config
            .validate()
            .map_err(GridStoreError::ConfigError)?;

        let path = Self::store_path(root, month);
        std::fs::create_dir_all(&path)?;
        let store = Arc::new(
            FilesystemStore::new(&path)
                .map_err(|e| GridStoreError::create_failed(e.to_string()))?,
        );

        let group = GroupBuilder::new()
            .build(store.clone(), "/")
            .map_err(|e| GridStoreError::create_failed(e.to_string()))?;
        group
            .store_metadata()
            .map_err(|e| GridStoreError::storage(e.to_string()))?;

        let nlat = shape_hint.lat_count() as u64;
        let nlon = shape_hint.lon_count() as u64;

        let time = build_array(
            store.clone(),
            "/time",
            vec![0],
            vec![config.time_axis_chunk as u64],
            DataType::Int64,
            FillValue::from(0i64),
            None,
            serde_json::Map::new(),
        )?;

        let mut lat_attrs = serde_json::Map::new();
        lat_attrs.insert("units".to_string(), serde_json::json!("degrees_north"));
        let lat = build_array(
            store.clone(),
            "/lat",
            vec![nlat],
            vec![nlat],
            DataType::Float32,
            FillValue::from(f32::NAN),
            None,
            lat_attrs,
        )?;

        let mut lon_attrs = serde_json::Map::new();
        lon_attrs.insert("units".to_string(), serde_json::json!("degrees_east"));
        let lon = build_array(
            store.clone(),
            "/lon",
            vec![nlon],
            vec![nlon],
            DataType::Float32,
            FillValue::from(f32::NAN),
            None,
            lon_attrs,
        )?;

        let codec = match config.compression {
            Compression::None => None,
            _ => Some(create_compression_codec(config)?),
        };
        let mut ws_attrs = serde_json::Map::new();
        ws_attrs.insert("units".to_string(), serde_json::json!("m/s"));
        ws_attrs.insert("long_name".to_string(), serde_json::json!("10m wind speed"));
        ws_attrs.insert("month".to_string(), serde_json::json!(month.label()));
        let spatial_chunk = config.spatial_chunk as u64;
        let wind_speed = build_array(
            store,
            "/wind_speed",
            vec![0, nlat, nlon],
            vec![
                config.time_chunk as u64,
                spatial_chunk.min(nlat),
                spatial_chunk.min(nlon),
            ],
            DataType::Float32,
            FillValue::from(FILL_VALUE),
            codec,
            ws_attrs,
        )?;

        // Axes are written once and never resized.
        let lat_values: Vec<f32> = shape_hint.lats.iter().map(|&v| v as f32).collect();
        write_full_1d(&lat, &lat_values)?;
        let lon_values: Vec<f32> = shape_hint.lons.iter().map(|&v| v as f32).collect();
        write_full_1d(&lon, &lon_values)?;

        info!(
            month = %month,
            lat = shape_hint.lat_count(),
            lon = shape_hint.lon_count(),
            path = %path.display(),
            "Created monthly grid store"
        );

        Ok(Self {
            month,
            path,
            grid: shape_hint.clone(),
            keys: Vec::new(),
            key_set: HashSet::new(),
            time,
            wind_speed,
        })
    }

    /// Append one timestep, or skip it silently if the key is already
    /// stored.
    ///
    /// The wind-speed slab is written before the time key: the `time`
    /// array is the commit point, so a crash mid-append leaves the key
    /// unrecorded and a rerun rewrites the slab.
    pub fn append_timestep(&mut self, key: TimeKey, field: &[f32]) -> Result<AppendOutcome> {
        if self.key_set.contains(&key) {
            debug!(month = %self.month, key = %key, "Timestep already stored, skipping");
            return Ok(AppendOutcome::SkippedDuplicate);
        }

        if let Some(&last) = self.keys.last() {
            if key < last {
                return Err(GridStoreError::OutOfOrder { key, last });
            }
        }

        let nlat = self.grid.lat_count();
        let nlon = self.grid.lon_count();
        if field.len() != nlat * nlon {
            return Err(GridStoreError::ShapeMismatch {
                expected_lat: nlat,
                expected_lon: nlon,
                actual: field.len(),
            });
        }

        let t = self.keys.len() as u64;

        self.wind_speed
            .set_shape(vec![t + 1, nlat as u64, nlon as u64]);
        self.wind_speed
            .store_metadata()
            .map_err(|e| GridStoreError::storage(e.to_string()))?;
        let slab = ArraySubset::new_with_start_shape(
            vec![t, 0, 0],
            vec![1, nlat as u64, nlon as u64],
        )
        .map_err(|e| GridStoreError::storage(e.to_string()))?;
        self.wind_speed
            .store_array_subset_elements(&slab, field)
            .map_err(|e| GridStoreError::storage(e.to_string()))?;

        self.time.set_shape(vec![t + 1]);
        self.time
            .store_metadata()
            .map_err(|e| GridStoreError::storage(e.to_string()))?;
        let slot = ArraySubset::new_with_start_shape(vec![t], vec![1])
            .map_err(|e| GridStoreError::storage(e.to_string()))?;
        self.time
            .store_array_subset_elements(&slot, &[key.encode()])
            .map_err(|e| GridStoreError::storage(e.to_string()))?;

        self.keys.push(key);
        self.key_set.insert(key);
        Ok(AppendOutcome::Appended)
    }

    /// Read a contiguous slab of `t_len` timesteps starting at
    /// `t_start`, row-major `(time, lat, lon)`.
    pub fn read_speed_chunk(&self, t_start: usize, t_len: usize) -> Result<Vec<f32>> {
        let stored = self.keys.len();
        if t_start + t_len > stored {
            return Err(GridStoreError::TimeRangeOutOfBounds {
                start: t_start,
                start_plus_len: t_start + t_len,
                stored,
            });
        }

        let subset = ArraySubset::new_with_start_shape(
            vec![t_start as u64, 0, 0],
            vec![
                t_len as u64,
                self.grid.lat_count() as u64,
                self.grid.lon_count() as u64,
            ],
        )
        .map_err(|e| GridStoreError::storage(e.to_string()))?;

        self.wind_speed
            .retrieve_array_subset_elements(&subset)
            .map_err(|e| GridStoreError::storage(e.to_string()))
    }

    /// Stored time keys, ascending.
    pub fn keys(&self) -> &[TimeKey] {
        &self.keys
    }

    /// Whether a time key is already stored.
    pub fn contains(&self, key: TimeKey) -> bool {
        self.key_set.contains(&key)
    }

    /// Number of stored timesteps.
    pub fn time_len(&self) -> usize {
        self.keys.len()
    }

    pub fn grid(&self) -> &RegularGrid {
        &self.grid
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[allow(clippy::too_many_arguments)]
fn build_array(
    store: Arc<FilesystemStore>,
    path: &str,
    shape: Vec<u64>,
    chunk_shape: Vec<u64>,
    data_type: DataType,
    fill_value: FillValue,
    codec: Option<Arc<dyn zarrs::array::codec::BytesToBytesCodecTraits>>,
    attributes: serde_json::Map<String, serde_json::Value>,
) -> Result<Array<FilesystemStore>> {
    let chunk_grid: zarrs::array::ChunkGrid = chunk_shape
        .try_into()
        .map_err(|e| GridStoreError::ConfigError(format!("{e:?}")))?;

    let mut binding = ArrayBuilder::new(shape, data_type, chunk_grid, fill_value);
    let mut builder = binding.attributes(attributes);
    if let Some(codec) = codec {
        builder = builder.bytes_to_bytes_codecs(vec![codec]);
    }

    let array = builder
        .build(store, path)
        .map_err(|e| GridStoreError::create_failed(e.to_string()))?;
    array
        .store_metadata()
        .map_err(|e| GridStoreError::storage(e.to_string()))?;
    Ok(array)
}

fn create_compression_codec(
    config: &GridStoreConfig,
) -> Result<Arc<dyn zarrs::array::codec::BytesToBytesCodecTraits>> {
    let level = BloscCompressionLevel::try_from(config.compression_level)
        .map_err(|_| GridStoreError::ConfigError("invalid compression level".to_string()))?;

    let shuffle = if config.shuffle {
        BloscShuffleMode::Shuffle
    } else {
        BloscShuffleMode::NoShuffle
    };

    // typesize is required when shuffle is enabled
    let typesize = if config.shuffle {
        Some(4) // f32 = 4 bytes
    } else {
        None
    };

    let compressor = match config.compression {
        Compression::None => {
            return Err(GridStoreError::ConfigError(
                "no compression configured".to_string(),
            ))
        }
        Compression::BloscLz4 => BloscCompressor::LZ4,
        Compression::BloscZstd => BloscCompressor::Zstd,
    };

    let codec = BloscCodec::new(compressor, level, None, shuffle, typesize)
        .map_err(|e| GridStoreError::ConfigError(e.to_string()))?;

    Ok(Arc::new(codec))
}

fn write_full_1d(array: &Array<FilesystemStore>, values: &[f32]) -> Result<()> {
    let subset = ArraySubset::new_with_start_shape(vec![0], vec![values.len() as u64])
        .map_err(|e| GridStoreError::storage(e.to_string()))?;
    array
        .store_array_subset_elements(&subset, values)
        .map_err(|e| GridStoreError::storage(e.to_string()))
}

fn read_axis(array: &Array<FilesystemStore>, name: &str) -> Result<Vec<f64>> {
    let shape = array.shape().to_vec();
    if shape.len() != 1 {
        return Err(GridStoreError::corrupt(format!("{name} array is not 1-D")));
    }
    let subset = ArraySubset::new_with_start_shape(vec![0], vec![shape[0]])
        .map_err(|e| GridStoreError::storage(e.to_string()))?;
    let values: Vec<f32> = array
        .retrieve_array_subset_elements(&subset)
        .map_err(|e| GridStoreError::corrupt(format!("cannot read {name} axis: {e}")))?;
    Ok(values.into_iter().map(|v| v as f64).collect())
}

fn read_time_keys(array: &Array<FilesystemStore>, len: usize) -> Result<Vec<TimeKey>> {
    if len == 0 {
        return Ok(Vec::new());
    }
    let subset = ArraySubset::new_with_start_shape(vec![0], vec![len as u64])
        .map_err(|e| GridStoreError::storage(e.to_string()))?;
    let encoded: Vec<i64> = array
        .retrieve_array_subset_elements(&subset)
        .map_err(|e| GridStoreError::corrupt(format!("cannot read time axis: {e}")))?;

    let mut keys = Vec::with_capacity(encoded.len());
    for value in encoded {
        keys.push(TimeKey::decode(value)?);
    }
    for pair in keys.windows(2) {
        if pair[1] <= pair[0] {
            return Err(GridStoreError::corrupt(format!(
                "time axis not strictly ascending at {} -> {}",
                pair[0], pair[1]
            )));
        }
    }
    Ok(keys)
}
