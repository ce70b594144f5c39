//! Common test utilities for integration tests
//!
//! Provides catalog and trace fixtures shared across integration test files.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Catalog with one minimum condition at `foo.ENTER` and an origin check at
/// `foo.EXIT`.
pub const CATALOG: &str = "\
===========================================================================
..foo(int):::ENTER
x > 0
===========================================================================
..foo(int):::EXIT
x == orig(x)
Exiting Daikon.
";

/// Trace with a single ENTER record whose `x = -5` sits on line 7.
pub const NEGATIVE_ENTER_TRACE: &str = "\
decl-version 2.0

..foo(int):::ENTER
this_invocation_nonce
1
x
-5
1

";

/// Trace whose records satisfy every invariant in [`CATALOG`].
pub const CLEAN_TRACE: &str = "\
..foo(int):::ENTER
this_invocation_nonce
1
x
4
1

..foo(int):::EXIT0
this_invocation_nonce
1
x
4
1

";

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write `content` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// Write the captured output for `trace_id` into `dir`.
pub fn write_captured_output(dir: &Path, trace_id: &str, content: &str) -> PathBuf {
    write_file(dir, &format!("std_outputfile-run-{trace_id}"), content)
}

/// Read a report and split it into lines.
pub fn report_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read report")
        .lines()
        .map(str::to_string)
        .collect()
}
