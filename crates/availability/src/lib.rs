//! Operable-wind availability analysis.
//!
//! For each location and year, counts the hours whose height-adjusted
//! wind speed falls inside the configured operable range, against the
//! total hours stored for the consulted months, and reports the ratio.
//! Speeds stored at the reference height are lifted to the target
//! height with a log wind profile using per-month surface roughness.

pub mod config;
pub mod engine;
pub mod error;
pub mod height;
pub mod result;

pub use config::AnalysisConfig;
pub use engine::AvailabilityEngine;
pub use error::{AvailabilityError, Result};
pub use height::height_coefficient;
pub use result::{write_validity_csv, ValidityResult};
