//! Analysis configuration.

use serde::Deserialize;

use crate::error::{AvailabilityError, Result};

/// Parameters of one analysis run. The operable range and heights are
/// plant characteristics, not code policy; deployments vary them
/// (typical ranges are 5..25, 3..25 and 5..20 m/s).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Lower operable wind speed bound at target height, m/s, inclusive.
    pub operable_min: f64,
    /// Upper operable wind speed bound at target height, m/s, inclusive.
    pub operable_max: f64,
    /// Height the stored speeds are valid at, meters.
    pub reference_height: f64,
    /// Hub height the speeds are adjusted to, meters.
    pub target_height: f64,
    /// Timesteps read per slab while scanning a month.
    pub time_chunk: usize,
    /// Roughness length when no roughness data covers a month, meters.
    pub default_z0: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            operable_min: 5.0,
            operable_max: 25.0,
            reference_height: 10.0,
            target_height: 109.0,
            time_chunk: 50,
            default_z0: roughness::DEFAULT_Z0,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.operable_min >= self.operable_max {
            return Err(AvailabilityError::Config(format!(
                "operable_min {} must be below operable_max {}",
                self.operable_min, self.operable_max
            )));
        }
        if self.reference_height <= 0.0 || self.target_height <= 0.0 {
            return Err(AvailabilityError::Config(
                "heights must be positive".to_string(),
            ));
        }
        if self.time_chunk == 0 {
            return Err(AvailabilityError::Config(
                "time_chunk must be > 0".to_string(),
            ));
        }
        if !(self.default_z0 > 0.0) {
            return Err(AvailabilityError::Config(
                "default_z0 must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        AnalysisConfig::default().validate().unwrap();
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = AnalysisConfig {
            operable_min: 25.0,
            operable_max: 5.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_chunk_rejected() {
        let config = AnalysisConfig {
            time_chunk: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
