//! Fixture builders for on-disk test setups.

use std::path::Path;

use aggregation::{Component, RawMessage};
use grid_store::{Compression, GridStoreConfig, MonthlyGridStore};
use wind_common::{MonthKey, RegularGrid, TimeKey, DEFAULT_MISSING_SENTINEL};

/// Store configuration used by fixtures: uncompressed, small chunks.
pub fn fixture_store_config() -> GridStoreConfig {
    GridStoreConfig {
        compression: Compression::None,
        ..Default::default()
    }
}

/// Create a month store under `root` with one field per timestep.
/// Steps are numbered from 0 on the first day of the month.
pub fn build_month_store(root: &Path, month: MonthKey, grid: &RegularGrid, fields: &[Vec<f32>]) {
    let mut store =
        MonthlyGridStore::open_or_create(root, month, grid, &fixture_store_config())
            .expect("create month store");
    let date = (month.year as u32) * 10_000 + month.month * 100 + 1;
    for (step, field) in fields.iter().enumerate() {
        let key = TimeKey::new(date, step as u32).expect("fixture time key");
        store.append_timestep(key, field).expect("append timestep");
    }
}

/// A U or V message on `grid` for one timestep.
pub fn component_message(
    grid: &RegularGrid,
    date: u32,
    step: u32,
    component: Component,
    values: Vec<f32>,
) -> RawMessage {
    RawMessage {
        date,
        step,
        component,
        lats: grid.lats.clone(),
        lons: grid.lons.clone(),
        values,
        missing: DEFAULT_MISSING_SENTINEL,
    }
}

/// Write an archive month directory containing one JSON file with a
/// complete U/V pair per `(date, step, u, v)` entry. Every cell of a
/// component field carries that component's value.
pub fn write_archive_month(
    archive_root: &Path,
    label: &str,
    grid: &RegularGrid,
    steps: &[(u32, u32, f32, f32)],
) {
    let dir = archive_root.join(label);
    std::fs::create_dir_all(&dir).expect("create archive month dir");

    let mut messages = Vec::with_capacity(steps.len() * 2);
    for &(date, step, u, v) in steps {
        messages.push(component_message(
            grid,
            date,
            step,
            Component::U,
            vec![u; grid.cell_count()],
        ));
        messages.push(component_message(
            grid,
            date,
            step,
            Component::V,
            vec![v; grid.cell_count()],
        ));
    }
    let json = serde_json::to_string(&messages).expect("serialize messages");
    std::fs::write(dir.join("messages.json"), json).expect("write archive file");
}

/// Write a uniform roughness grid for a month beside the stores.
pub fn write_uniform_roughness(root: &Path, month: MonthKey, grid: &RegularGrid, z0: f32) {
    let values = vec![z0; grid.cell_count()];
    roughness::write_roughness_grid(&roughness::roughness_path(root, month), grid, &values)
        .expect("write roughness grid");
}
