//! Configuration for the grid store.

use serde::{Deserialize, Serialize};

/// Configuration for monthly grid stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStoreConfig {
    /// Chunk length along the time axis of `wind_speed`. One timestep
    /// per chunk keeps appends aligned to whole chunks, so growing the
    /// axis never rewrites compressed data already on disk.
    pub time_chunk: usize,

    /// Spatial chunk dimension (square chunks over lat/lon).
    pub spatial_chunk: usize,

    /// Chunk length of the 1-D `time` array.
    pub time_axis_chunk: usize,

    /// Compression codec for the `wind_speed` array.
    pub compression: Compression,

    /// Compression level (1-9).
    pub compression_level: u8,

    /// Enable byte shuffle filter for better compression.
    pub shuffle: bool,
}

impl Default for GridStoreConfig {
    fn default() -> Self {
        Self {
            time_chunk: 1,
            spatial_chunk: 512,
            time_axis_chunk: 1024,
            compression: Compression::BloscZstd,
            compression_level: 1,
            shuffle: true,
        }
    }
}

impl GridStoreConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_SPATIAL_CHUNK") {
            if let Ok(size) = val.parse() {
                config.spatial_chunk = size;
            }
        }

        if let Ok(val) = std::env::var("GRID_TIME_CHUNK") {
            if let Ok(size) = val.parse() {
                config.time_chunk = size;
            }
        }

        if let Ok(val) = std::env::var("GRID_COMPRESSION") {
            config.compression = Compression::from_str(&val);
        }

        if let Ok(val) = std::env::var("GRID_COMPRESSION_LEVEL") {
            if let Ok(level) = val.parse() {
                config.compression_level = level;
            }
        }

        if let Ok(val) = std::env::var("GRID_SHUFFLE") {
            config.shuffle = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_chunk == 0 {
            return Err("time_chunk must be > 0".to_string());
        }

        if self.spatial_chunk == 0 {
            return Err("spatial_chunk must be > 0".to_string());
        }

        if self.time_axis_chunk == 0 {
            return Err("time_axis_chunk must be > 0".to_string());
        }

        if self.compression_level == 0 || self.compression_level > 9 {
            return Err("compression_level must be 1-9".to_string());
        }

        Ok(())
    }
}

/// Compression codec for the wind-speed array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compression {
    /// No compression.
    None,
    /// Blosc with LZ4.
    BloscLz4,
    /// Blosc with Zstd (recommended).
    BloscZstd,
}

impl Default for Compression {
    fn default() -> Self {
        Self::BloscZstd
    }
}

impl Compression {
    /// Parse from string (case-insensitive). Unknown values fall back
    /// to the default codec with a warning.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" => Self::None,
            "blosc_lz4" | "lz4" => Self::BloscLz4,
            "blosc_zstd" | "zstd" => Self::BloscZstd,
            other => {
                tracing::warn!(value = other, "Unknown compression codec, using blosc_zstd");
                Self::BloscZstd
            }
        }
    }

    /// Get the codec name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BloscLz4 => "blosc_lz4",
            Self::BloscZstd => "blosc_zstd",
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridStoreConfig::default();
        assert_eq!(config.time_chunk, 1);
        assert_eq!(config.spatial_chunk, 512);
        assert_eq!(config.compression, Compression::BloscZstd);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = GridStoreConfig::default();
        config.spatial_chunk = 0;
        assert!(config.validate().is_err());

        config = GridStoreConfig::default();
        config.compression_level = 0;
        assert!(config.validate().is_err());

        config.compression_level = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_compression_from_str() {
        assert_eq!(Compression::from_str("none"), Compression::None);
        assert_eq!(Compression::from_str("lz4"), Compression::BloscLz4);
        assert_eq!(Compression::from_str("BLOSC_ZSTD"), Compression::BloscZstd);
        assert_eq!(Compression::from_str("zstd"), Compression::BloscZstd);
        assert_eq!(Compression::from_str("invalid"), Compression::BloscZstd);
    }
}
