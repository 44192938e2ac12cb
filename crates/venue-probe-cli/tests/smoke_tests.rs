//! Smoke tests for the venue-probe CLI
//!
//! Runs use `--driver fake` so no browser is needed.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the venue-probe binary
fn venue_probe() -> Command {
    let mut cmd = Command::cargo_bin("venue-probe").expect("venue-probe binary should exist");
    for var in [
        "VENUE_PROBE_BASE_URL",
        "VENUE_PROBE_CITY",
        "VENUE_PROBE_FALLBACK_CITY",
        "VENUE_PROBE_CLICK_BUDGET",
        "VENUE_PROBE_LOCATORS",
        "VENUE_PROBE_ARTIFACTS_DIR",
        "VENUE_PROBE_DRIVER",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// `run` against the in-memory map with no settle delay
fn fake_run(dir: &TempDir) -> Command {
    let mut cmd = venue_probe();
    cmd.args(["--color", "never", "run", "--driver", "fake", "--settle-ms", "0"])
        .arg("--artifacts-dir")
        .arg(dir.path().join("artifacts"));
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    venue_probe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    venue_probe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("locators"));
}

#[test]
fn test_no_args_shows_help() {
    venue_probe().assert().failure();
}

#[test]
fn test_run_help_mentions_env() {
    venue_probe()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VENUE_PROBE_CITY"))
        .stdout(predicate::str::contains("--budget"));
}

// ============================================================================
// list / locators
// ============================================================================

#[test]
fn test_list_shows_every_scenario() {
    venue_probe()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("page_load"))
        .stdout(predicate::str::contains("over_filtering_shows_empty_state"))
        .stdout(predicate::str::contains("load_latency"));
}

#[test]
fn test_locators_prints_table() {
    venue_probe()
        .arg("locators")
        .assert()
        .success()
        .stdout(predicate::str::contains("version: 1"))
        .stdout(predicate::str::contains("filter_header"))
        .stdout(predicate::str::contains("option_exclusions"));
}

#[test]
fn test_locators_check_embedded() {
    venue_probe()
        .args(["--color", "never", "locators", "--check"])
        .assert()
        .success()
        .stderr(predicate::str::contains("is valid"));
}

#[test]
fn test_locators_check_rejects_incomplete_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("locators.yaml");
    fs::write(&path, "version: 1\ntargets:\n  filter_header:\n    css: h2\n").unwrap();

    venue_probe()
        .args(["locators", "--check", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing targets"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_fake_run_passes() {
    let dir = TempDir::new().unwrap();
    fake_run(&dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("PASSED 7 scenarios"));
}

#[test]
fn test_fake_run_json_output() {
    let dir = TempDir::new().unwrap();
    let output = fake_run(&dir)
        .args(["--format", "json", "-s", "page_load"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report.to_string().contains("page_load"));
}

#[test]
fn test_fake_run_writes_junit() {
    let dir = TempDir::new().unwrap();
    let junit = dir.path().join("junit.xml");
    fake_run(&dir)
        .args(["-s", "filter_changes_results", "--junit"])
        .arg(&junit)
        .assert()
        .success();
    let xml = fs::read_to_string(junit).unwrap();
    assert!(xml.contains("filter_changes_results"));
}

#[test]
fn test_unknown_scenario_fails() {
    let dir = TempDir::new().unwrap();
    fake_run(&dir)
        .args(["-s", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown scenario 'nope'"));
}

#[test]
fn test_failing_scenario_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    // zero budget leaves the sample map far above the partial ceiling
    fake_run(&dir)
        .args(["-s", "over_filtering_shows_empty_state", "--budget", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 1 scenarios failed"));

    let shots: Vec<_> = fs::read_dir(dir.path().join("artifacts")).unwrap().collect();
    assert_eq!(shots.len(), 1);
}

#[test]
fn test_city_from_env() {
    let dir = TempDir::new().unwrap();
    fake_run(&dir)
        .env("VENUE_PROBE_CITY", "Dubai")
        .args(["-s", "over_filtering_shows_empty_state"])
        .assert()
        .success();
}
