//! A resolved per-cell roughness field.

use wind_common::RegularGrid;

/// Roughness lengths for one month on their own lat/lon axes, flattened
/// row-major, or uniform when no grid data was available.
///
/// Roughness products are usually coarser than the wind grids, so a
/// gridded field carries its axes and callers resolve cells against
/// those, not against the wind grid.
#[derive(Debug, Clone)]
pub struct RoughnessField {
    cells: Option<(RegularGrid, Vec<f64>)>,
    default_z0: f64,
}

impl RoughnessField {
    pub fn uniform(default_z0: f64) -> Self {
        Self {
            cells: None,
            default_z0,
        }
    }

    pub fn gridded(grid: RegularGrid, cells: Vec<f64>, default_z0: f64) -> Self {
        Self {
            cells: Some((grid, cells)),
            default_z0,
        }
    }

    /// Roughness length at a flattened cell index of this field's own
    /// grid. Cells outside the field, non-finite values, and
    /// non-positive values all resolve to the default. z0 must be
    /// positive for the log profile.
    pub fn z0(&self, flat_index: usize) -> f64 {
        let value = self
            .cells
            .as_ref()
            .and_then(|(_, cells)| cells.get(flat_index))
            .copied();
        match value {
            Some(z0) if z0.is_finite() && z0 > 0.0 => z0,
            _ => self.default_z0,
        }
    }

    /// Whether the field carries per-cell data.
    pub fn is_gridded(&self) -> bool {
        self.cells.is_some()
    }

    /// Axes of the gridded data, if any. Callers map locations to
    /// flat indices over these axes before calling [`RoughnessField::z0`].
    pub fn grid(&self) -> Option<&RegularGrid> {
        self.cells.as_ref().map(|(grid, _)| grid)
    }

    /// Raw per-cell values, if gridded. Invalid entries are still
    /// present here; [`RoughnessField::z0`] applies the default.
    pub fn cells(&self) -> Option<&[f64]> {
        self.cells.as_ref().map(|(_, cells)| cells.as_slice())
    }
}
