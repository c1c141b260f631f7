//! Per-location availability results and CSV export.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// One location's availability for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidityResult {
    pub latitude: f64,
    pub longitude: f64,
    pub year: i32,
    /// Hours whose adjusted speed fell inside the operable range.
    pub valid_hours: u64,
    /// Hours stored across the consulted months.
    pub total_hours: u64,
    /// `valid_hours / total_hours`, `0.0` when nothing was stored.
    pub ratio: f64,
}

impl ValidityResult {
    pub fn new(latitude: f64, longitude: f64, year: i32, valid_hours: u64, total_hours: u64) -> Self {
        let ratio = if total_hours == 0 {
            0.0
        } else {
            valid_hours as f64 / total_hours as f64
        };
        Self {
            latitude,
            longitude,
            year,
            valid_hours,
            total_hours,
            ratio,
        }
    }
}

/// Write results as CSV with a header row:
/// `latitude,longitude,year,valid_hours,total_hours,ratio`.
pub fn write_validity_csv(path: &Path, results: &[ValidityResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}
