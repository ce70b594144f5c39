//! Quoted-field violation report.
//!
//! ```text
//! "LineNumber","FunctionKey","Invariant","Class","TraceID"
//! "7","foo.ENTER","x > 0","minimum-condition","3"
//! ```
//!
//! With outcome correlation a sixth column carries the run's failure mode
//! as `ErrorMode.Benign`, `ErrorMode.SDC`, `ErrorMode.Crash` or
//! `ErrorMode.Undefined`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::domain::errors::{ValidatorError, ValidatorResult};
use crate::domain::models::Violation;
use crate::domain::ports::ViolationSink;

/// Columns present in every report.
pub const BASE_COLUMNS: [&str; 5] = ["LineNumber", "FunctionKey", "Invariant", "Class", "TraceID"];

/// Extra column written when outcome correlation is enabled.
pub const FAILURE_MODE_COLUMN: &str = "FailureMode";

/// Render one row of quoted fields; embedded quotes are doubled.
pub fn quote_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|field| format!("\"{}\"", field.as_ref().replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Writes the report header once, then one row per violation.
pub struct ViolationReporter<W: Write> {
    writer: W,
}

impl ViolationReporter<BufWriter<File>> {
    /// Truncate `path` and write the header.
    pub fn create(path: &Path, with_failure_mode: bool) -> ValidatorResult<Self> {
        let unwritable = |source| ValidatorError::OutputUnwritable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(unwritable)?;
        Self::new(BufWriter::new(file), with_failure_mode).map_err(unwritable)
    }
}

impl<W: Write> ViolationReporter<W> {
    /// Wrap a writer and emit the header.
    pub fn new(mut writer: W, with_failure_mode: bool) -> io::Result<Self> {
        let mut header = BASE_COLUMNS.to_vec();
        if with_failure_mode {
            header.push(FAILURE_MODE_COLUMN);
        }
        writeln!(writer, "{}", quote_row(&header))?;
        Ok(Self { writer })
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ViolationSink for ViolationReporter<W> {
    fn record(&mut self, violation: &Violation) -> io::Result<()> {
        writeln!(self.writer, "{}", quote_row(&violation.fields()))
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
