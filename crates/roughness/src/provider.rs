//! Roughness sources and the tiered monthly provider.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};
use walkdir::WalkDir;

use wind_common::{MonthKey, RegularGrid};

use crate::error::Result;
use crate::field::RoughnessField;
use crate::store::read_roughness_grid;

/// Something that can produce a roughness field for a month.
pub trait RoughnessSource {
    fn field(&mut self, month: MonthKey) -> Result<Arc<RoughnessField>>;
}

/// A uniform roughness length everywhere, for runs without roughness
/// products.
pub struct ConstantRoughness {
    field: Arc<RoughnessField>,
}

impl ConstantRoughness {
    pub fn new(z0: f64) -> Self {
        Self {
            field: Arc::new(RoughnessField::uniform(z0)),
        }
    }
}

impl RoughnessSource for ConstantRoughness {
    fn field(&mut self, _month: MonthKey) -> Result<Arc<RoughnessField>> {
        Ok(self.field.clone())
    }
}

/// Raw axes and cells of one on-disk grid.
type RawGrid = Arc<(RegularGrid, Vec<f64>)>;

/// Tiered provider over a directory of `YYYY-MM_roughness.zarr` grids.
///
/// A cell resolves to the exact month grid's value when that is valid,
/// else to the cell's long-term average over every grid on disk, else
/// to the uniform default. The average also stands in for whole months
/// with no grid. Resolved fields are cached for the life of the
/// provider.
pub struct MonthlyRoughnessProvider {
    default_z0: f64,
    available: BTreeMap<MonthKey, PathBuf>,
    raw_cache: HashMap<MonthKey, Option<RawGrid>>,
    resolved_cache: HashMap<MonthKey, Arc<RoughnessField>>,
    average: Option<Option<RawGrid>>,
    uniform: Arc<RoughnessField>,
}

impl MonthlyRoughnessProvider {
    /// Scan `root` for monthly roughness grids. A root with no grids
    /// is valid; every lookup then resolves to the default.
    pub fn scan(root: &Path, default_z0: f64) -> Result<Self> {
        let mut available = BTreeMap::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(month) = parse_label(&name) {
                available.insert(month, entry.path().to_path_buf());
            }
        }

        debug!(
            root = %root.display(),
            grids = available.len(),
            "Scanned roughness grids"
        );

        Ok(Self {
            default_z0,
            available,
            raw_cache: HashMap::new(),
            resolved_cache: HashMap::new(),
            average: None,
            uniform: Arc::new(RoughnessField::uniform(default_z0)),
        })
    }

    /// Months with an exact grid on disk.
    pub fn available_months(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.available.keys().copied()
    }

    fn load_raw(&mut self, month: MonthKey) -> Option<RawGrid> {
        if let Some(cached) = self.raw_cache.get(&month) {
            return cached.clone();
        }
        let path = self.available.get(&month)?.clone();
        let loaded = match read_roughness_grid(&path) {
            Ok((grid, values)) => Some(Arc::new((grid, values))),
            Err(e) => {
                warn!(month = %month, error = %e, "Unreadable roughness grid, falling back");
                None
            }
        };
        self.raw_cache.insert(month, loaded.clone());
        loaded
    }

    /// Per-cell mean over every readable grid on disk, computed once.
    /// Cells with no valid sample stay NaN and resolve to the default.
    fn long_term_average(&mut self) -> Option<RawGrid> {
        if let Some(cached) = &self.average {
            return cached.clone();
        }

        let months: Vec<MonthKey> = self.available.keys().copied().collect();

        let mut axes: Option<RegularGrid> = None;
        let mut sums: Vec<f64> = Vec::new();
        let mut counts: Vec<u32> = Vec::new();
        for month in months {
            let raw = match self.load_raw(month) {
                Some(raw) => raw,
                None => continue,
            };
            let (grid, cells) = (&raw.0, &raw.1);
            match &axes {
                None => {
                    axes = Some(grid.clone());
                    sums = vec![0.0; cells.len()];
                    counts = vec![0; cells.len()];
                }
                Some(reference) if reference != grid => {
                    warn!(
                        month = %month,
                        "Roughness grid axes differ from siblings, excluded from average"
                    );
                    continue;
                }
                Some(_) => {}
            }
            for (i, &z0) in cells.iter().enumerate() {
                if z0.is_finite() && z0 > 0.0 {
                    sums[i] += z0;
                    counts[i] += 1;
                }
            }
        }

        let result = axes.map(|grid| {
            let cells: Vec<f64> = sums
                .iter()
                .zip(&counts)
                .map(|(&sum, &n)| if n > 0 { sum / n as f64 } else { f64::NAN })
                .collect();
            Arc::new((grid, cells))
        });
        self.average = Some(result.clone());
        result
    }
}

impl RoughnessSource for MonthlyRoughnessProvider {
    fn field(&mut self, month: MonthKey) -> Result<Arc<RoughnessField>> {
        if let Some(field) = self.resolved_cache.get(&month) {
            return Ok(field.clone());
        }

        let resolved = match self.load_raw(month) {
            Some(raw) => {
                let mut cells = raw.1.clone();
                if let Some(avg) = self.long_term_average() {
                    if avg.0 == raw.0 {
                        for (cell, &mean) in cells.iter_mut().zip(&avg.1) {
                            if !(cell.is_finite() && *cell > 0.0) {
                                *cell = mean;
                            }
                        }
                    }
                }
                Arc::new(RoughnessField::gridded(raw.0.clone(), cells, self.default_z0))
            }
            None => match self.long_term_average() {
                Some(avg) => {
                    debug!(month = %month, "No exact roughness grid, using long-term average");
                    Arc::new(RoughnessField::gridded(
                        avg.0.clone(),
                        avg.1.clone(),
                        self.default_z0,
                    ))
                }
                None => {
                    debug!(month = %month, default_z0 = self.default_z0, "No roughness data, using default");
                    self.uniform.clone()
                }
            },
        };
        self.resolved_cache.insert(month, resolved.clone());
        Ok(resolved)
    }
}

/// Parse `YYYY-MM_roughness.zarr` directory names.
fn parse_label(name: &str) -> Option<MonthKey> {
    let label = name.strip_suffix("_roughness.zarr")?;
    let (year, month) = label.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(MonthKey::new(year, month))
}
