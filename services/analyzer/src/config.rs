//! Analyzer service configuration.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use availability::AnalysisConfig;

/// Top-level analyzer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerServiceConfig {
    /// Root directory of the monthly wind-speed grid stores.
    pub store_root: PathBuf,

    /// Root directory of monthly roughness grids. Absent means the
    /// default roughness length everywhere.
    #[serde(default)]
    pub roughness_root: Option<PathBuf>,

    /// CSV file with `latitude,longitude` columns, one row per point.
    pub locations_file: PathBuf,

    /// Directory receiving `wind_availability_{year}.csv` files.
    pub output_dir: PathBuf,

    /// Years to evaluate.
    pub years: Vec<i32>,

    /// Operable range, heights, chunking and default z0.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl AnalyzerServiceConfig {
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
        let store_root =
            env::var("WIND_STORE_ROOT").context("WIND_STORE_ROOT is required without --config")?;
        let locations_file = env::var("WIND_LOCATIONS_FILE")
            .context("WIND_LOCATIONS_FILE is required without --config")?;
        let output_dir = env::var("WIND_OUTPUT_DIR")
            .context("WIND_OUTPUT_DIR is required without --config")?;
        let years = env::var("WIND_YEARS")
            .context("WIND_YEARS is required without --config (comma-separated)")?
            .split(',')
            .map(|y| y.trim().parse::<i32>().context("WIND_YEARS must be integers"))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            store_root: PathBuf::from(store_root),
            roughness_root: env::var("WIND_ROUGHNESS_ROOT").ok().map(PathBuf::from),
            locations_file: PathBuf::from(locations_file),
            output_dir: PathBuf::from(output_dir),
            years,
            analysis: AnalysisConfig::default(),
        })
    }
}
