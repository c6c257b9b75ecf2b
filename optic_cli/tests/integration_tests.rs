//! Integration tests for the optic binary.
//!
//! These tests verify end-to-end behavior including:
//! - Prescription validation output and exit status
//! - Transposition
//! - Spheric and toric conversion with configuration
//! - CSV batch conversion

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a directory holding an empty config file
fn setup_test_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("config.toml"), "").expect("Failed to write config");
    dir
}

/// Helper to run the CLI against the config in `dir`
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("optic"));
    cmd.arg("--config").arg(dir.path().join("config.toml"));
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn test_cli_help() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("contact lens conversion"));
}

#[test]
fn test_validate_formats_fields() {
    let dir = setup_test_dir();
    let output = cli(&dir)
        .args(["validate", "--sph", "-3.5", "--cyl", "-0.75", "--axis", "90"])
        .args(["--add", "2", "--pd", "63"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["valid"], true);
    assert_eq!(report["formatted"]["sphere"], "-03.50");
    assert_eq!(report["formatted"]["cylinder"], "-00.75");
    assert_eq!(report["formatted"]["axis"], 90);
    assert_eq!(report["formatted"]["add"], "+02.00");
    assert_eq!(report["formatted"]["pd"], 63);
}

#[test]
fn test_validate_combo_failure() {
    let dir = setup_test_dir();
    let output = cli(&dir)
        .args(["validate", "--sph", "-3.5", "--cyl", "1.0"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["valid"], false);
    assert_eq!(report["errors"].as_array().unwrap().len(), 1);
    assert!(report["errors"][0].as_str().unwrap().contains("combination"));
    assert_eq!(report["formatted"], serde_json::json!({}));
}

#[test]
fn test_validate_reports_every_bad_field() {
    let dir = setup_test_dir();
    let output = cli(&dir)
        .args(["validate", "--sph", "-3.1", "--pd", "90", "--bv", "12"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["errors"].as_array().unwrap().len(), 2);
    assert_eq!(report["formatted"]["vertex_distance"], 12.0);
}

#[test]
fn test_transpose() {
    let dir = setup_test_dir();
    let output = cli(&dir)
        .args(["transpose", "--sph", "-2.00", "--cyl", "1.00", "--axis", "90"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let t = stdout_json(&output);
    assert_eq!(t["sph"], "-01.00");
    assert_eq!(t["cyl"], "-01.00");
    assert_eq!(t["axis"], 180);
}

#[test]
fn test_transpose_rejects_minus_cylinder() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["transpose", "--sph", "-2.00", "--cyl", "-1.00", "--axis", "90"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot transpose"));
}

#[test]
fn test_transpose_rejects_non_numeric_text() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["transpose", "--sph", "-2.00", "--cyl", "one", "--axis", "90"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid CYL value"));
}

#[test]
fn test_validate_negative_measurements_reach_errors() {
    let dir = setup_test_dir();
    let output = cli(&dir)
        .args(["validate", "--sph", "-1.00", "--bv", "-3", "--pd", "-60", "--sg", "-7"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let report = stdout_json(&output);
    let errors: Vec<&str> = report["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().any(|e| e.starts_with("BV")));
    assert!(errors.iter().any(|e| e.starts_with("PD")));
    assert!(errors.iter().any(|e| e.starts_with("SG")));
    assert_eq!(report["formatted"]["sphere"], "-01.00");
}

#[test]
fn test_spheric_conversion() {
    let dir = setup_test_dir();
    let output = cli(&dir)
        .args(["spheric", "--sph", "-7.00", "--cyl", "-1.00", "--axis", "90", "--bv", "12"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let lens = stdout_json(&output);
    assert_eq!(lens["SPH"], "-07.00");
    assert_eq!(lens["Exact SPH"], "-06.88");
    assert_eq!(lens["AX"], "");
    assert_eq!(lens["BV"], 12.0);
}

#[test]
fn test_toric_conversion() {
    let dir = setup_test_dir();
    let output = cli(&dir)
        .args(["toric", "--sph", "-5.00", "--cyl", "-1.00", "--axis", "90"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let lens = stdout_json(&output);
    assert_eq!(lens["SPH"], "-04.75");
    assert_eq!(lens["CY"], "-01.00");
    assert_eq!(lens["AX"], "90");
    assert_eq!(lens["Exact CY"], "-00.88");
}

#[test]
fn test_configured_vertex_distance_default() {
    let dir = setup_test_dir();
    fs::write(
        dir.path().join("config.toml"),
        "[conversion]\ndefault_vertex_distance_mm = 14.0\n",
    )
    .unwrap();

    let output = cli(&dir).args(["spheric", "--sph", "-8.00"]).output().unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["BV"], 14.0);
}

#[test]
fn test_conversion_rejects_non_numeric() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["spheric", "--sph", "minus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid SPH value"));
}

#[test]
fn test_batch_conversion() {
    let dir = setup_test_dir();
    let input = dir.path().join("rx.csv");
    let output = dir.path().join("lenses.csv");
    fs::write(&input, "SPH,CY,AX,BV\n-5.00,-1.00,90,12\nbad,,,\n").unwrap();

    cli(&dir)
        .args(["batch", "--kind", "toric", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Converted 1 rows"))
        .stderr(predicate::str::contains("1 skipped"));

    let csv_content = fs::read_to_string(&output).expect("Failed to read CSV");
    assert!(csv_content.starts_with("SPH,CY,AX,ADD,BV,Exact SPH,Exact CY"));
    assert!(csv_content.contains("-04.75,-01.00,90"));
}

#[test]
fn test_batch_missing_input() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["batch", "--input"])
        .arg(dir.path().join("missing.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_batch_all_rows_skipped_still_writes_header() {
    let dir = setup_test_dir();
    let input = dir.path().join("rx.csv");
    let output = dir.path().join("lenses.csv");
    fs::write(&input, "SPH\nabc\n").unwrap();

    cli(&dir)
        .args(["batch", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Converted 0 rows"));

    let csv_content = fs::read_to_string(&output).expect("Failed to read CSV");
    assert_eq!(csv_content.trim_end(), "SPH,ADD,AX,BV,Exact SPH");
}
