mod common;

use std::fmt::Write as _;

use encoding_rs::UTF_8;
use proptest::prelude::*;

use csv_explore::{
    frame::DataFrame,
    pipeline::{self, drop_duplicate_rows, drop_missing_rows, scale_numeric},
    schema::ColumnType,
};

use common::{TestWorkspace, fixture_path};

fn load(path: &std::path::Path) -> DataFrame {
    DataFrame::load(path, b',', UTF_8).expect("load frame")
}

/// 100 data rows: 5 exact duplicates and 10 rows with a missing value, with
/// no overlap between the two groups.
fn synthetic_crashes_csv() -> String {
    let mut csv = String::from("Date,Operator,Aboard,Fatalities\n");
    for idx in 0..85 {
        let _ = writeln!(
            csv,
            "19{:02}-03-{:02},Operator {},{},{}",
            30 + idx % 60,
            1 + idx % 28,
            idx,
            10 + idx,
            idx % 11
        );
    }
    // Five exact copies of the first synthetic row.
    for _ in 0..5 {
        let _ = writeln!(csv, "1930-03-01,Operator 0,10,0");
    }
    // Ten rows missing the Aboard value.
    for idx in 0..10 {
        let _ = writeln!(csv, "1940-06-{:02},Operator gap {},,{}", idx + 1, idx, idx);
    }
    csv
}

#[test]
fn cleaner_yields_unique_complete_rows() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("synthetic.csv", &synthetic_crashes_csv());
    let mut frame = load(&path);
    assert_eq!(frame.row_count(), 100);

    assert_eq!(drop_missing_rows(&mut frame), 10);
    assert_eq!(drop_duplicate_rows(&mut frame), 5);
    assert_eq!(frame.row_count(), 85);
}

#[test]
fn fixture_runs_the_full_pipeline() {
    let workspace = TestWorkspace::new();
    let contents = std::fs::read_to_string(fixture_path("crashes.csv")).expect("fixture");
    let path = workspace.write("crashes.csv", &contents);

    let mut frame = load(&path);
    assert_eq!(frame.row_count(), 20);

    let summary = pipeline::prepare(&mut frame, "Date").expect("prepare");
    assert_eq!(summary.incomplete_rows_removed, 3);
    assert_eq!(summary.duplicate_rows_removed, 2);
    assert_eq!(summary.values_imputed, 0);
    assert_eq!(summary.dates_coerced, 1);
    assert_eq!(summary.columns_scaled, 2);
    assert_eq!(frame.row_count(), 15);

    let date = frame.column("Date").expect("date column");
    assert_eq!(date.datatype, ColumnType::Date);
    assert_eq!(date.missing_count(), 1);

    for name in ["Aboard", "Fatalities"] {
        let values: Vec<f64> = frame
            .column(name)
            .expect("numeric column")
            .numeric_values()
            .into_iter()
            .flatten()
            .collect();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min, 0.0, "column {name}");
        assert_eq!(max, 1.0, "column {name}");
    }
}

#[test]
fn tsv_inputs_load_with_a_tab_delimiter() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("crashes.tsv", "Aboard\tFatalities\n10\t5\n20\t15\n");
    let frame = DataFrame::load(&path, b'\t', UTF_8).expect("load tsv");
    assert_eq!(frame.row_count(), 2);
    assert_eq!(frame.column_count(), 2);
}

proptest! {
    #[test]
    fn scaled_columns_land_in_the_unit_interval(
        values in proptest::collection::vec(-1.0e6..1.0e6f64, 1..64)
    ) {
        let workspace = TestWorkspace::new();
        let mut csv = String::from("V\n");
        for value in &values {
            let _ = writeln!(csv, "{value}");
        }
        let path = workspace.write("values.csv", &csv);
        let mut frame = load(&path);
        scale_numeric(&mut frame);

        let scaled: Vec<f64> = frame
            .column("V")
            .expect("column")
            .numeric_values()
            .into_iter()
            .flatten()
            .collect();
        prop_assert_eq!(scaled.len(), values.len());
        for value in &scaled {
            prop_assert!((0.0..=1.0).contains(value));
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            prop_assert!(scaled.iter().all(|v| *v == 0.0));
        }
    }
}
