//! CLI integration tests for the validate-invariants binary.

mod common;

use assert_cmd::Command;
use common::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

/// Build a command for the binary with its working directory set to `dir`,
/// so the default output file and config lookup stay inside the sandbox.
fn validator_cmd(dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo_bin_cmd!("validate-invariants");
    cmd.current_dir(dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_exits_zero() {
    let dir = temp_dir();
    validator_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--invariantFile"))
        .stdout(predicate::str::contains("--dtracedir"));
}

#[test]
fn test_unknown_flag_prints_usage_and_fails() {
    let dir = temp_dir();
    validator_cmd(dir.path())
        .args(["--invariantFile", "inv.txt", "--bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_missing_catalog_fails() {
    let dir = temp_dir();
    let trace = write_file(dir.path(), "run.1.dtrace", CLEAN_TRACE);
    validator_cmd(dir.path())
        .args(["--invariantFile", "missing.txt", "--dtraceFile"])
        .arg(&trace)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("missing.txt"));
}

#[test]
fn test_missing_trace_fails() {
    let dir = temp_dir();
    write_file(dir.path(), "inv.txt", CATALOG);
    validator_cmd(dir.path())
        .args(["--invariantFile", "inv.txt", "--dtraceFile", "absent.1.dtrace"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.1.dtrace"));
}

#[test]
fn test_default_output_file() {
    let dir = temp_dir();
    write_file(dir.path(), "inv.txt", CATALOG);
    write_file(dir.path(), "llfi.stat.trace.9.dtrace", NEGATIVE_ENTER_TRACE);

    validator_cmd(dir.path())
        .args([
            "--invariantFile",
            "inv.txt",
            "--dtraceFile",
            "llfi.stat.trace.9.dtrace",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let report = fs::read_to_string(dir.path().join("DaikonTraceOutput.txt")).unwrap();
    assert!(report.contains(r#""7","foo.ENTER","x > 0","minimum-condition","9""#));
}

#[test]
fn test_env_override_selects_output_path() {
    let dir = temp_dir();
    write_file(dir.path(), "inv.txt", CATALOG);
    write_file(dir.path(), "run.4.dtrace", NEGATIVE_ENTER_TRACE);

    validator_cmd(dir.path())
        .env("INVARIANT_VALIDATOR_OUTPUT_PATH", "from-env.csv")
        .args(["--invariantFile", "inv.txt", "--dtraceFile", "run.4.dtrace"])
        .assert()
        .success();

    assert!(dir.path().join("from-env.csv").is_file());
}

#[test]
fn test_config_file_sets_golden_output() {
    let dir = temp_dir();
    let outputs = dir.path().join("outputs");
    fs::create_dir(&outputs).unwrap();
    write_captured_output(&outputs, "4", "checksum 1234\n");
    write_file(dir.path(), "inv.txt", CATALOG);
    write_file(dir.path(), "run.4.dtrace", NEGATIVE_ENTER_TRACE);
    write_file(
        dir.path(),
        "validator.yaml",
        "output_path: report.csv\nfailure:\n  golden_output: \"checksum 9999\"\n",
    );

    validator_cmd(dir.path())
        .args([
            "--config",
            "validator.yaml",
            "--invariantFile",
            "inv.txt",
            "--dtraceFile",
            "run.4.dtrace",
            "--outputdir",
            "outputs",
        ])
        .assert()
        .success();

    let report = fs::read_to_string(dir.path().join("report.csv")).unwrap();
    assert!(report.contains(r#""minimum-condition","4","ErrorMode.SDC""#));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = temp_dir();
    validator_cmd(dir.path())
        .args([
            "--config",
            "nope.yaml",
            "--invariantFile",
            "inv.txt",
            "--dtraceFile",
            "a.1.dtrace",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nope.yaml"));
}
