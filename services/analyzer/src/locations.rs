//! Location table input.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use wind_common::Location;

#[derive(Debug, Deserialize)]
struct LocationRow {
    latitude: f64,
    longitude: f64,
}

/// Load locations from a CSV file with `latitude,longitude` columns.
/// Extra columns are ignored; row order is preserved.
pub fn load_locations(path: &Path) -> Result<Vec<Location>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening location table {}", path.display()))?;

    let mut locations = Vec::new();
    for (row, record) in reader.deserialize::<LocationRow>().enumerate() {
        let record = record.with_context(|| format!("location table row {}", row + 2))?;
        locations.push(Location::new(record.latitude, record.longitude));
    }
    anyhow::ensure!(
        !locations.is_empty(),
        "location table {} has no rows",
        path.display()
    );
    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_preserves_order_and_ignores_extras() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turbines.csv");
        std::fs::write(
            &path,
            "latitude,longitude,name\n51.5,0.1,first\n48.8,-2.3,second\n",
        )
        .unwrap();

        let locations = load_locations(&path).unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0], Location::new(51.5, 0.1));
        assert_eq!(locations[1], Location::new(48.8, -2.3));
    }

    #[test]
    fn test_empty_table_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "latitude,longitude\n").unwrap();
        assert!(load_locations(&path).is_err());
    }

    #[test]
    fn test_malformed_row_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "latitude,longitude\nnot-a-number,0.1\n").unwrap();
        let err = load_locations(&path).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }
}
