//! Year evaluation over monthly grid stores.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use grid_store::MonthlyGridStore;
use roughness::RoughnessSource;
use spatial_index::GridIndex;
use wind_common::{CancelFlag, GridFingerprint, Location, MonthKey, RegularGrid, FILL_VALUE};

use crate::config::AnalysisConfig;
use crate::error::{AvailabilityError, Result};
use crate::height::height_coefficient;
use crate::result::ValidityResult;

/// Evaluates operable availability for a fixed set of locations.
///
/// One engine instance serves one location set: nearest-cell indices
/// are cached per grid fingerprint, for wind and roughness grids
/// alike, and reused across months and years as long as the grids
/// carry the same axes.
pub struct AvailabilityEngine {
    store_root: PathBuf,
    config: AnalysisConfig,
    cancel: CancelFlag,
    cell_cache: HashMap<GridFingerprint, Arc<Vec<usize>>>,
}

impl AvailabilityEngine {
    pub fn new(store_root: PathBuf, config: AnalysisConfig, cancel: CancelFlag) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store_root,
            config,
            cancel,
            cell_cache: HashMap::new(),
        })
    }

    /// Evaluate one calendar year. Returns one result per input
    /// location, in input order.
    ///
    /// Months without a grid store are excluded from both the valid
    /// and total counters; a month that exists but cannot be opened is
    /// logged and skipped the same way. `total_hours` is exactly the
    /// number of timesteps stored across the months that were read.
    pub fn evaluate_year(
        &mut self,
        year: i32,
        locations: &[Location],
        roughness: &mut dyn RoughnessSource,
    ) -> Result<Vec<ValidityResult>> {
        let mut valid = vec![0_u64; locations.len()];
        let mut total = 0_u64;

        for month in 1..=12 {
            let month_key = MonthKey::new(year, month);
            if !MonthlyGridStore::exists(&self.store_root, month_key) {
                warn!(month = %month_key, "No grid store for month, excluded from totals");
                continue;
            }
            let store = match MonthlyGridStore::open(&self.store_root, month_key) {
                Ok(store) => store,
                Err(e) => {
                    error!(month = %month_key, error = %e, "Unreadable month skipped");
                    continue;
                }
            };
            if store.time_len() == 0 {
                debug!(month = %month_key, "Month store is empty");
                continue;
            }

            let flats = self.cells_for(store.grid(), locations)?;
            let field = roughness.field(month_key)?;
            // Roughness products carry their own, usually coarser,
            // axes; locations get a second nearest-cell resolution
            // over those before any z0 lookup.
            let z0_flats = match field.grid() {
                Some(z0_grid) => Some(self.cells_for(z0_grid, locations)?),
                None => None,
            };
            let coefficients: Vec<f64> = (0..locations.len())
                .map(|i| {
                    let z0 = match &z0_flats {
                        Some(cells) => field.z0(cells[i]),
                        None => field.z0(0),
                    };
                    height_coefficient(
                        self.config.target_height,
                        self.config.reference_height,
                        z0,
                    )
                })
                .collect();

            self.scan_month(&store, &flats, &coefficients, &mut valid)?;
            total += store.time_len() as u64;
        }

        info!(year, locations = locations.len(), total_hours = total, "Year evaluated");
        Ok(locations
            .iter()
            .zip(&valid)
            .map(|(location, &valid_hours)| {
                ValidityResult::new(
                    location.latitude,
                    location.longitude,
                    year,
                    valid_hours,
                    total,
                )
            })
            .collect())
    }

    /// Classify every stored timestep of one month, slab by slab.
    fn scan_month(
        &self,
        store: &MonthlyGridStore,
        flats: &[usize],
        coefficients: &[f64],
        valid: &mut [u64],
    ) -> Result<()> {
        let cells = store.grid().cell_count();
        let min = self.config.operable_min;
        let max = self.config.operable_max;

        let mut t = 0;
        while t < store.time_len() {
            if self.cancel.is_cancelled() {
                return Err(AvailabilityError::Cancelled);
            }
            let len = self.config.time_chunk.min(store.time_len() - t);
            let slab = store.read_speed_chunk(t, len)?;

            valid
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, counter)| {
                    let flat = flats[i];
                    let coefficient = coefficients[i];
                    for step in 0..len {
                        let speed = slab[step * cells + flat];
                        if speed == FILL_VALUE {
                            continue;
                        }
                        let adjusted = speed as f64 * coefficient;
                        if adjusted >= min && adjusted <= max {
                            *counter += 1;
                        }
                    }
                });

            t += len;
        }
        Ok(())
    }

    fn cells_for(
        &mut self,
        grid: &RegularGrid,
        locations: &[Location],
    ) -> Result<Arc<Vec<usize>>> {
        let fingerprint = grid.fingerprint();
        if let Some(cached) = self.cell_cache.get(&fingerprint) {
            return Ok(cached.clone());
        }
        let index = GridIndex::build(grid)?;
        let cells = index.query_batch(locations)?;
        let flats: Arc<Vec<usize>> =
            Arc::new(cells.into_iter().map(|cell| grid.flat_index(cell)).collect());
        self.cell_cache.insert(fingerprint, flats.clone());
        debug!(locations = locations.len(), "Resolved nearest cells for grid");
        Ok(flats)
    }
}
