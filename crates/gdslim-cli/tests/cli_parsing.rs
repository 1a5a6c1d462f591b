//! CLI parsing tests for the gdslim command
//!
//! Tests that verify CLI argument parsing works correctly.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the gdslim binary
#[allow(deprecated)]
fn gdslim() -> Command {
    Command::cargo_bin("gdslim").expect("Failed to find gdslim binary")
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_shows_all_commands() {
    gdslim()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("classify"))
        .stdout(predicate::str::contains("detect"))
        .stdout(predicate::str::contains("set"));
}

#[test]
fn test_version_flag() {
    gdslim()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gdslim"));
}

// ============================================================================
// Global Options Tests
// ============================================================================

#[test]
fn test_global_options_in_help() {
    gdslim()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--root"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--api-json"))
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--quiet"));
}

// ============================================================================
// Set Command Tests
// ============================================================================

#[test]
fn test_set_help_lists_modes() {
    gdslim()
        .args(["set", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("none"))
        .stdout(predicate::str::contains("2d"))
        .stdout(predicate::str::contains("3d"))
        .stdout(predicate::str::contains("custom"));
}

#[test]
fn test_set_preset_toggles_in_help() {
    gdslim()
        .args(["set", "2d", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--disable-xr"))
        .stdout(predicate::str::contains("--disable-networking"))
        .stdout(predicate::str::contains("--disable-navigation"))
        .stdout(predicate::str::contains("--disable-editor"))
        .stdout(predicate::str::contains("--disable-animation"))
        .stdout(predicate::str::contains("--disable-ui"));
}

#[test]
fn test_set_custom_no_detect_in_help() {
    gdslim()
        .args(["set", "custom", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-detect"));
}

#[test]
fn test_set_requires_a_mode() {
    gdslim().arg("set").assert().failure();
}

#[test]
fn test_set_rejects_unknown_mode() {
    gdslim().args(["set", "4d"]).assert().failure();
}

// ============================================================================
// Detect and Classify Tests
// ============================================================================

#[test]
fn test_detect_help() {
    gdslim()
        .args(["detect", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--closure"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_classify_help() {
    gdslim()
        .args(["classify", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--domain"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_classify_rejects_unknown_domain() {
    gdslim()
        .args(["classify", "--domain", "quantum"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown domain"));
}
