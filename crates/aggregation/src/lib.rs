//! Aggregation pipeline: raw U/V component messages in, monthly
//! wind-speed grids out.
//!
//! The archive is a directory of `YYYY-MM/` month directories, each
//! holding JSON message dumps (optionally gzip-compressed). Each
//! message carries one component field for one `(date, step)`
//! timestep. The pipeline pairs U with V per timestep, converts the
//! pair to scalar speed, and appends it to the month's grid store.
//! Months run concurrently; everything is idempotent, so rerunning
//! over the same archive only fills in what a previous run missed.

pub mod aggregator;
pub mod archive;
pub mod error;
pub mod index;
pub mod message;

pub use aggregator::{AggregationSummary, Aggregator, AggregatorConfig};
pub use archive::{read_messages, scan_archive};
pub use error::{AggregationError, Result};
pub use index::{MessageIndex, SamplePair};
pub use message::{Component, RawMessage};
