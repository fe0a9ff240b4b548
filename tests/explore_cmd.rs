mod common;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

use common::{TestWorkspace, fixture_path};

fn explore_cmd() -> Command {
    Command::cargo_bin("csv-explore").expect("binary built")
}

#[test]
fn explore_prints_shape_preview_and_metric_tables() {
    explore_cmd()
        .arg("explore")
        .arg("-i")
        .arg(fixture_path("crashes.csv"))
        .assert()
        .success()
        .stdout(
            contains("Loaded 20 row(s) across 5 column(s)")
                .and(contains("Processed preview:"))
                .and(contains("Numeric column metrics:"))
                .and(contains("Categorical column metrics:"))
                .and(contains("Fatalities"))
                .and(contains("Operator"))
                .and(contains("top_value")),
        );
}

#[test]
fn explore_reports_inferred_column_types() {
    explore_cmd()
        .arg("explore")
        .arg("-i")
        .arg(fixture_path("crashes.csv"))
        .assert()
        .success()
        // The fixture's Date column holds one unparseable value, so it loads
        // as a string column until the date normalizer retypes it.
        .stdout(contains("integer").and(contains("string")));
}

#[test]
fn explore_json_emits_parseable_metrics() {
    let output = explore_cmd()
        .arg("explore")
        .arg("-i")
        .arg(fixture_path("crashes.csv"))
        .arg("--json")
        .output()
        .expect("run explore --json");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf-8 stdout");
    let start = stdout.find('{').expect("JSON document in stdout");
    let json: serde_json::Value =
        serde_json::from_str(&stdout[start..]).expect("parseable metrics JSON");

    assert_eq!(json["Fatalities"]["missing"], 0);
    assert!(json["Fatalities"]["mean"].as_f64().is_some());
    assert!(json["Operator"]["top_value"].is_string());
    // Scaled numeric columns span exactly [0, 1].
    assert_eq!(json["Aboard"]["range"], 1.0);
}

#[test]
fn explore_fails_on_a_missing_input_file() {
    explore_cmd()
        .arg("explore")
        .arg("-i")
        .arg("no-such-file.csv")
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("Loading frame from")));
}

#[test]
fn explore_fails_on_an_unknown_date_column() {
    explore_cmd()
        .arg("explore")
        .arg("-i")
        .arg(fixture_path("crashes.csv"))
        .arg("--date-column")
        .arg("Nope")
        .assert()
        .failure()
        .stderr(contains("Normalizing date column 'Nope'"));
}

#[test]
fn explore_honours_an_explicit_delimiter() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "crashes.txt",
        "Date;Operator;Aboard;Fatalities\n1972-06-14;KLM;101;53\n1985-03-10;Aeroflot;98;70\n",
    );
    explore_cmd()
        .arg("explore")
        .arg("-i")
        .arg(&path)
        .arg("--delimiter")
        .arg(";")
        .assert()
        .success()
        .stdout(contains("Loaded 2 row(s) across 4 column(s)"));
}
