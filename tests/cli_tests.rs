//! Integration tests for the h2retrofit CLI
//!
//! These tests run the actual CLI binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the binary to test
fn h2r_cmd() -> Command {
    Command::cargo_bin("h2retrofit").unwrap()
}

#[test]
fn test_help_flag() {
    h2r_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Parametric model of a hydrogen-retrofitted single-aisle aircraft",
        ))
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_evaluate_help() {
    h2r_cmd()
        .args(["evaluate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--set"));
}

// ============================================================================
// Evaluate
// ============================================================================

#[test]
fn test_evaluate_baseline_text() {
    h2r_cmd()
        .arg("evaluate")
        .assert()
        .success()
        .stdout(predicate::str::contains("cabin.passengers"))
        .stdout(predicate::str::contains("120"))
        .stdout(predicate::str::contains("% MAC"))
        .stdout(predicate::str::contains("FAILED").not());
}

#[test]
fn test_evaluate_json() {
    let output = h2r_cmd()
        .args(["evaluate", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["passengers"]["ok"], 120);
    assert!(parsed["cg_percent_mac"]["ok"].is_number());
    assert!(parsed["tanks"]["ok"]["tanks"].is_array());
}

#[test]
fn test_evaluate_with_set() {
    h2r_cmd()
        .args(["evaluate", "--set", "fuselage.length=40", "--set", "tank.count=2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("length 40.00 m"))
        .stdout(predicate::str::contains("2 tank(s)"));
}

#[test]
fn test_evaluate_rejects_bad_set_value() {
    h2r_cmd()
        .args(["evaluate", "--set", "fuselage.length=long"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("H2R-031"))
        .stderr(predicate::str::contains("is not a number"));
}

#[test]
fn test_evaluate_rejects_derived_id() {
    h2r_cmd()
        .args(["evaluate", "--set", "wing.mac=4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("H2R-014"));
}

#[test]
fn test_evaluate_reports_rule_failure() {
    h2r_cmd()
        .args(["evaluate", "--set", "tank.count=5"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("wing.mac"))
        .stderr(predicate::str::contains("tank.sizing"));
}

#[test]
fn test_evaluate_with_seating_file() {
    let temp_dir = TempDir::new().unwrap();
    let seating = temp_dir.path().join("cabin.seats");
    fs::write(
        &seating,
        "# single class\nclass economy rows=24 seats=6 pitch=0.76\n",
    )
    .unwrap();

    h2r_cmd()
        .args(["evaluate", "--seating", seating.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("144"));
}

#[test]
fn test_evaluate_with_bad_seating_file() {
    let temp_dir = TempDir::new().unwrap();
    let seating = temp_dir.path().join("cabin.seats");
    fs::write(&seating, "class economy rows=many seats=6 pitch=0.76\n").unwrap();

    h2r_cmd()
        .args(["evaluate", "--seating", seating.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn test_evaluate_with_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("constants.yaml");
    fs::write(&config, "tank:\n  max_tanks: 4\n").unwrap();

    h2r_cmd()
        .args([
            "evaluate",
            "--config",
            config.to_str().unwrap(),
            "--set",
            "tank.count=3",
            "--set",
            "fuselage.length=45",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 tank(s)"));
}

#[test]
fn test_negative_config_constant_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("constants.yaml");
    fs::write(&config, "cabin:\n  allowances:\n    galley_length: -0.5\n").unwrap();

    h2r_cmd()
        .args(["evaluate", "--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("H2R-035"))
        .stderr(predicate::str::contains("cabin.allowances.galley_length"));
}

#[test]
fn test_evaluate_with_empty_cargo_holds() {
    h2r_cmd()
        .args(["evaluate", "--set", "cargo.load_fraction=0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cargo.holds"))
        .stdout(predicate::str::contains("3 forward + 3 aft containers"));
}

// ============================================================================
// Save / validate
// ============================================================================

#[test]
fn test_save_then_validate_then_reload() {
    let temp_dir = TempDir::new().unwrap();
    let model = temp_dir.path().join("stretch.json");
    let model_path = model.to_str().unwrap();

    h2r_cmd()
        .args(["save", "--set", "fuselage.length=41", "-o", model_path])
        .assert()
        .success()
        .stdout(predicate::str::contains("Model saved"));

    let json = fs::read_to_string(&model).unwrap();
    assert!(json.contains("h2retrofit/model@0.1"));

    h2r_cmd()
        .args(["validate", model_path])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"))
        .stdout(predicate::str::contains("Inputs: 8"));

    h2r_cmd()
        .args(["evaluate", "--model", model_path])
        .assert()
        .success()
        .stdout(predicate::str::contains("length 41.00 m"));
}

#[test]
fn test_validate_rejects_unknown_input() {
    let temp_dir = TempDir::new().unwrap();
    let model = temp_dir.path().join("bad.json");
    fs::write(
        &model,
        r#"{"schema": "h2retrofit/model@0.1", "inputs": {"fuselage.width": {"scalar": 4.0}}}"#,
    )
    .unwrap();

    h2r_cmd()
        .args(["validate", model.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fuselage.width"));
}

#[test]
fn test_validate_rejects_malformed_document() {
    let temp_dir = TempDir::new().unwrap();
    let model = temp_dir.path().join("bad.json");
    fs::write(&model, r#"{"inputs": {}}"#).unwrap();

    h2r_cmd()
        .args(["validate", model.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_validate_missing_file() {
    h2r_cmd()
        .args(["validate", "does-not-exist.json"])
        .assert()
        .failure();
}

// ============================================================================
// Report / nodes
// ============================================================================

#[test]
fn test_report_to_stdout() {
    h2r_cmd()
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hydrogen Retrofit Design Report"))
        .stdout(predicate::str::contains("Baseline Aircraft: Airbus A320"))
        .stdout(predicate::str::contains("C.G. position"));
}

#[test]
fn test_report_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let report = temp_dir.path().join("report.txt");

    h2r_cmd()
        .args([
            "report",
            "--baseline",
            "A321",
            "-o",
            report.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written"));

    let text = fs::read_to_string(&report).unwrap();
    assert!(text.contains("Airbus A321"));
    assert!(text.contains("LH2 capacity"));
}

#[test]
fn test_nodes_lists_graph() {
    h2r_cmd()
        .arg("nodes")
        .assert()
        .success()
        .stdout(predicate::str::contains("fuselage.length"))
        .stdout(predicate::str::contains("mass.properties"))
        .stdout(predicate::str::contains("<- mass.properties, wing.lemac_x, wing.mac"));
}
