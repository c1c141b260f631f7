//! Persistent monthly wind-speed grids.
//!
//! Each calendar month of data lives in one Zarr V3 group on disk with
//! four arrays:
//!
//! ```text
//! YYYY-MM_wind_speed.zarr/
//!   time        1-D i64, growable   encoded (date, step) keys, ascending
//!   lat         1-D f32, fixed      grid latitudes
//!   lon         1-D f32, fixed      grid longitudes
//!   wind_speed  3-D f32, compressed (time, lat, lon), fill -9999.0
//! ```
//!
//! The lat/lon dimensions are fixed at first creation; only the time
//! axis grows. Appends are idempotent: a time key already present is a
//! no-op, which makes whole-archive reruns safe. The `time` array is
//! the commit point for an append, so an interrupted write never marks
//! a partially written timestep as stored.

pub mod config;
pub mod error;
pub mod ledger;
pub mod speed;
pub mod store;

pub use config::{Compression, GridStoreConfig};
pub use error::{GridStoreError, Result};
pub use ledger::ProcessedMonths;
pub use speed::compute_speed;
pub use store::{AppendOutcome, MonthlyGridStore};
