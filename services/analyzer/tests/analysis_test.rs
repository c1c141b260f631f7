//! Store-to-CSV analysis flow with fixture data.

use availability::{AnalysisConfig, AvailabilityEngine, write_validity_csv};
use roughness::{MonthlyRoughnessProvider, RoughnessSource};
use test_utils::{build_month_store, regular_grid, uniform_field, write_uniform_roughness};
use wind_common::{CancelFlag, Location, MonthKey};

#[test]
fn test_year_report_from_fixture_store() {
    let dir = tempfile::tempdir().unwrap();
    let grid = regular_grid(52.0, 0.0, 0.25, 2, 2);
    let month = MonthKey::new(2002, 6);

    // Identity height profile, so 10 m/s is operable and 30 is not.
    let fields = vec![
        uniform_field(&grid, 10.0),
        uniform_field(&grid, 10.0),
        uniform_field(&grid, 30.0),
    ];
    build_month_store(dir.path(), month, &grid, &fields);
    write_uniform_roughness(dir.path(), month, &grid, 0.03);

    let config = AnalysisConfig {
        operable_min: 5.0,
        operable_max: 25.0,
        reference_height: 10.0,
        target_height: 10.0,
        ..Default::default()
    };
    let mut engine =
        AvailabilityEngine::new(dir.path().to_path_buf(), config, CancelFlag::new()).unwrap();
    let mut provider = MonthlyRoughnessProvider::scan(dir.path(), 0.03).unwrap();

    let locations = [Location::new(52.0, 0.0), Location::new(51.75, 0.25)];
    let results = engine
        .evaluate_year(2002, &locations, &mut provider)
        .unwrap();

    let out = dir.path().join("wind_availability_2002.csv");
    write_validity_csv(&out, &results).unwrap();

    let content = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "latitude,longitude,year,valid_hours,total_hours,ratio"
    );
    assert_eq!(lines.len(), 3);
    for line in &lines[1..] {
        assert!(line.ends_with(",2002,2,3,0.6666666666666666"));
    }
}
