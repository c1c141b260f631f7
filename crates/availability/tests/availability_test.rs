//! End-to-end availability evaluation against on-disk monthly grids.

use std::path::Path;

use availability::{AnalysisConfig, AvailabilityEngine};
use grid_store::{Compression, GridStoreConfig, MonthlyGridStore};
use roughness::{roughness_path, ConstantRoughness, MonthlyRoughnessProvider};
use wind_common::{CancelFlag, Location, MonthKey, RegularGrid, TimeKey, FILL_VALUE};

fn store_config() -> GridStoreConfig {
    GridStoreConfig {
        compression: Compression::None,
        ..Default::default()
    }
}

fn write_month(root: &Path, month: MonthKey, grid: &RegularGrid, fields: &[Vec<f32>]) {
    let mut store = MonthlyGridStore::open_or_create(root, month, grid, &store_config()).unwrap();
    let date = (month.year as u32) * 10_000 + month.month * 100 + 1;
    for (step, field) in fields.iter().enumerate() {
        let key = TimeKey::new(date, step as u32).unwrap();
        store.append_timestep(key, field).unwrap();
    }
}

fn identity_height_config(operable_min: f64, operable_max: f64) -> AnalysisConfig {
    // target == reference makes the profile coefficient exactly 1.
    AnalysisConfig {
        operable_min,
        operable_max,
        reference_height: 10.0,
        target_height: 10.0,
        time_chunk: 7,
        ..Default::default()
    }
}

#[test]
fn test_ratio_counts_valid_against_total() {
    let dir = tempfile::tempdir().unwrap();
    let grid = RegularGrid::new(vec![50.0], vec![10.0]);
    let month = MonthKey::new(2002, 6);

    let mut fields: Vec<Vec<f32>> = Vec::new();
    for _ in 0..40 {
        fields.push(vec![10.0]);
    }
    for _ in 0..60 {
        fields.push(vec![30.0]);
    }
    write_month(dir.path(), month, &grid, &fields);

    let mut engine = AvailabilityEngine::new(
        dir.path().to_path_buf(),
        identity_height_config(5.0, 25.0),
        CancelFlag::new(),
    )
    .unwrap();
    let mut roughness = ConstantRoughness::new(0.03);
    let results = engine
        .evaluate_year(2002, &[Location::new(50.0, 10.0)], &mut roughness)
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].valid_hours, 40);
    assert_eq!(results[0].total_hours, 100);
    assert!((results[0].ratio - 0.4).abs() < 1e-12);
    // Every non-valid stored hour is accounted for in the total.
    assert_eq!(results[0].total_hours - results[0].valid_hours, 60);
}

#[test]
fn test_height_adjustment_with_roughness_grid() {
    let dir = tempfile::tempdir().unwrap();
    let grid = RegularGrid::new(vec![50.0, 49.75], vec![10.0, 10.25]);
    let month = MonthKey::new(2002, 6);

    // Cell 0 exercises the operable boundary after adjustment by
    // ln(109/0.03)/ln(10/0.03) ~ 1.4112; cell 3 stays mid-range.
    let fields = vec![
        vec![5.0, 0.0, 0.0, 10.0],
        vec![4.0, 0.0, 0.0, 10.0],
        vec![20.0, 0.0, 0.0, 10.0],
        vec![3.0, 0.0, 0.0, 10.0],
        vec![FILL_VALUE; 4],
    ];
    write_month(dir.path(), month, &grid, &fields);
    roughness::write_roughness_grid(
        &roughness_path(dir.path(), month),
        &grid,
        &[0.03, 0.03, 0.03, 0.03],
    )
    .unwrap();

    let config = AnalysisConfig {
        operable_min: 5.0,
        operable_max: 20.0,
        reference_height: 10.0,
        target_height: 109.0,
        time_chunk: 2,
        ..Default::default()
    };
    let mut engine =
        AvailabilityEngine::new(dir.path().to_path_buf(), config, CancelFlag::new()).unwrap();
    let mut provider = MonthlyRoughnessProvider::scan(dir.path(), 0.03).unwrap();

    let locations = [Location::new(50.0, 10.0), Location::new(49.75, 10.25)];
    let results = engine
        .evaluate_year(2002, &locations, &mut provider)
        .unwrap();

    // 5.0 and 4.0 adjust into [5, 20]; 20.0 overshoots, 3.0 falls
    // short, and the fill timestep is skipped but stays in the total.
    assert_eq!(results[0].valid_hours, 2);
    assert_eq!(results[0].total_hours, 5);

    assert_eq!(results[1].valid_hours, 4);
    assert_eq!(results[1].total_hours, 5);
}

#[test]
fn test_coarser_roughness_grid_resolved_on_own_axes() {
    let dir = tempfile::tempdir().unwrap();
    let wind_grid = RegularGrid::new(vec![50.0, 49.75], vec![10.0, 10.25]);
    let month = MonthKey::new(2002, 6);

    // One coarse roughness cell covers the whole wind grid. With
    // z0 = 0.5 the coefficient is ln(109/0.5)/ln(10/0.5) ~ 1.7974,
    // lifting 3.0 m/s to ~5.39; the bare default z0 would leave it
    // below the 5 m/s floor.
    let fields = vec![vec![3.0, 0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0, 0.0]];
    write_month(dir.path(), month, &wind_grid, &fields);
    let z0_grid = RegularGrid::new(vec![49.875], vec![10.125]);
    roughness::write_roughness_grid(&roughness_path(dir.path(), month), &z0_grid, &[0.5])
        .unwrap();

    let config = AnalysisConfig {
        operable_min: 5.0,
        operable_max: 20.0,
        reference_height: 10.0,
        target_height: 109.0,
        time_chunk: 2,
        ..Default::default()
    };
    let mut engine =
        AvailabilityEngine::new(dir.path().to_path_buf(), config, CancelFlag::new()).unwrap();
    let mut provider = MonthlyRoughnessProvider::scan(dir.path(), 0.03).unwrap();

    let results = engine
        .evaluate_year(2002, &[Location::new(50.0, 10.0)], &mut provider)
        .unwrap();
    assert_eq!(results[0].valid_hours, 1);
    assert_eq!(results[0].total_hours, 2);
}

#[test]
fn test_missing_months_excluded_from_totals() {
    let dir = tempfile::tempdir().unwrap();
    let grid = RegularGrid::new(vec![50.0], vec![10.0]);
    write_month(
        dir.path(),
        MonthKey::new(2002, 6),
        &grid,
        &[vec![10.0], vec![10.0]],
    );

    let mut engine = AvailabilityEngine::new(
        dir.path().to_path_buf(),
        identity_height_config(5.0, 25.0),
        CancelFlag::new(),
    )
    .unwrap();
    let mut roughness = ConstantRoughness::new(0.03);
    let results = engine
        .evaluate_year(2002, &[Location::new(50.0, 10.0)], &mut roughness)
        .unwrap();

    // Only June has data; the other eleven months neither add valid
    // hours nor inflate the denominator.
    assert_eq!(results[0].total_hours, 2);
    assert_eq!(results[0].valid_hours, 2);
    assert!((results[0].ratio - 1.0).abs() < 1e-12);
}

#[test]
fn test_cancelled_run_errors() {
    let dir = tempfile::tempdir().unwrap();
    let grid = RegularGrid::new(vec![50.0], vec![10.0]);
    write_month(dir.path(), MonthKey::new(2002, 6), &grid, &[vec![10.0]]);

    let cancel = CancelFlag::new();
    cancel.cancel();
    let mut engine = AvailabilityEngine::new(
        dir.path().to_path_buf(),
        identity_height_config(5.0, 25.0),
        cancel,
    )
    .unwrap();
    let mut roughness = ConstantRoughness::new(0.03);
    let err = engine
        .evaluate_year(2002, &[Location::new(50.0, 10.0)], &mut roughness)
        .unwrap_err();
    assert!(matches!(err, availability::AvailabilityError::Cancelled));
}

#[test]
fn test_empty_year_yields_zero_ratio() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = AvailabilityEngine::new(
        dir.path().to_path_buf(),
        identity_height_config(5.0, 25.0),
        CancelFlag::new(),
    )
    .unwrap();
    let mut roughness = ConstantRoughness::new(0.03);
    let results = engine
        .evaluate_year(1995, &[Location::new(50.0, 10.0)], &mut roughness)
        .unwrap();
    assert_eq!(results[0].total_hours, 0);
    assert_eq!(results[0].ratio, 0.0);
}
