//! Raw component messages as they arrive from the archive.

use serde::{Deserialize, Serialize};
use wind_common::{RegularGrid, TimeKey, DEFAULT_MISSING_SENTINEL};

use crate::error::Result;

/// Which horizontal wind component a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    U,
    V,
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::U => write!(f, "u"),
            Self::V => write!(f, "v"),
        }
    }
}

/// One decoded field: a single component at a single timestep on a
/// regular grid, flattened row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    /// Valid date as `YYYYMMDD`.
    pub date: u32,
    /// Forecast step in hours.
    pub step: u32,
    pub component: Component,
    /// Grid latitudes, one per row.
    pub lats: Vec<f64>,
    /// Grid longitudes, one per column.
    pub lons: Vec<f64>,
    /// Field values, `lats.len() * lons.len()` entries.
    pub values: Vec<f32>,
    /// Sentinel marking unobserved cells in `values`.
    #[serde(default = "default_missing")]
    pub missing: f32,
}

fn default_missing() -> f32 {
    DEFAULT_MISSING_SENTINEL
}

impl RawMessage {
    pub fn time_key(&self) -> Result<TimeKey> {
        Ok(TimeKey::new(self.date, self.step)?)
    }

    pub fn grid(&self) -> RegularGrid {
        RegularGrid::new(self.lats.clone(), self.lons.clone())
    }

    /// Whether the value buffer matches the declared axes.
    pub fn is_consistent(&self) -> bool {
        !self.lats.is_empty()
            && !self.lons.is_empty()
            && self.values.len() == self.lats.len() * self.lons.len()
    }
}
