//! Aggregator service configuration.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use grid_store::GridStoreConfig;

fn default_parallel_months() -> usize {
    2
}

/// Top-level aggregator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorServiceConfig {
    /// Archive root holding `YYYY-MM/` message directories.
    pub archive_root: PathBuf,

    /// Output root for grid stores and the month ledger.
    pub store_root: PathBuf,

    /// Months processed concurrently.
    #[serde(default = "default_parallel_months")]
    pub parallel_months: usize,

    /// Grid store tuning.
    #[serde(default)]
    pub grid: GridStoreConfig,
}

impl AggregatorServiceConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {path}"))?;
        let config: Self =
            serde_yaml::from_str(&content).with_context(|| format!("parsing {path}"))?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let archive_root = env::var("WIND_ARCHIVE_ROOT")
            .context("WIND_ARCHIVE_ROOT is required without --config")?;
        let store_root =
            env::var("WIND_STORE_ROOT").context("WIND_STORE_ROOT is required without --config")?;
        let parallel_months = match env::var("WIND_PARALLEL_MONTHS") {
            Ok(value) => value
                .parse()
                .context("WIND_PARALLEL_MONTHS must be an integer")?,
            Err(_) => default_parallel_months(),
        };

        Ok(Self {
            archive_root: PathBuf::from(archive_root),
            store_root: PathBuf::from(store_root),
            parallel_months,
            grid: GridStoreConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_with_defaults() {
        let config: AggregatorServiceConfig = serde_yaml::from_str(
            "archive_root: /data/archive\nstore_root: /data/grids\n",
        )
        .unwrap();
        assert_eq!(config.parallel_months, 2);
        assert_eq!(config.grid.time_chunk, GridStoreConfig::default().time_chunk);
    }

    #[test]
    fn test_yaml_overrides_grid_section() {
        let config: AggregatorServiceConfig = serde_yaml::from_str(
            "archive_root: /a\nstore_root: /b\nparallel_months: 4\ngrid:\n  spatial_chunk: 128\n",
        )
        .unwrap();
        assert_eq!(config.parallel_months, 4);
        assert_eq!(config.grid.spatial_chunk, 128);
    }
}
