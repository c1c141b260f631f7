//! Shared test utilities for the wind-availability workspace.
//!
//! This crate provides common testing infrastructure:
//! - Synthetic grid and field generators
//! - Fixture builders for on-disk month stores, archives, and
//!   roughness grids
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;
