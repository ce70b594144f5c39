//! Streaming parser for trace files.
//!
//! A trace is a sequence of records, each terminated by a blank line:
//!
//! ```text
//! ..foo(int):::ENTER
//! this_invocation_nonce
//! 17
//! x
//! -5
//! 1
//!
//! ```
//!
//! Lines before the first `..` header (declarations, version lines) are
//! ignored. The stream makes a single forward pass and yields one
//! [`TraceRecord`] per terminated record.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;

use crate::domain::errors::{ValidatorError, ValidatorResult};
use crate::domain::models::{ProgramPoint, TraceRecord, VariableSnapshot};

const NONCE_MARKER: &str = "this_invocation_nonce";
const MODIFIED_FLAG: &str = "1";

#[derive(Debug)]
enum Pending {
    Nothing,
    Nonce,
    Value(String),
}

#[derive(Debug)]
struct OpenRecord {
    point: ProgramPoint,
    invocation: Option<String>,
    snapshot: VariableSnapshot,
}

/// Lazy iterator over the finalized records of one trace.
pub struct TraceStream<R> {
    lines: Lines<R>,
    line_number: usize,
    open: Option<OpenRecord>,
    pending: Pending,
}

impl TraceStream<BufReader<File>> {
    /// Open a trace file for streaming.
    pub fn open(path: &Path) -> ValidatorResult<Self> {
        let file = File::open(path).map_err(|source| ValidatorError::TraceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TraceStream<R> {
    /// Stream records from any line source.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            open: None,
            pending: Pending::Nothing,
        }
    }

    /// Feed one line; returns a record when the line terminates one.
    fn consume(&mut self, line: &str) -> Option<TraceRecord> {
        if let Some(point) = ProgramPoint::parse_header(line) {
            self.open = Some(OpenRecord {
                point: point.normalize_exit(),
                invocation: None,
                snapshot: VariableSnapshot::new(),
            });
            self.pending = Pending::Nothing;
            return None;
        }

        let record = self.open.as_mut()?;

        if line == NONCE_MARKER {
            self.pending = Pending::Nonce;
            return None;
        }

        match std::mem::replace(&mut self.pending, Pending::Nothing) {
            Pending::Nonce => {
                record.invocation = Some(line.to_string());
                return None;
            }
            Pending::Value(name) => {
                record.snapshot.insert(name, line, self.line_number);
                return None;
            }
            Pending::Nothing => {}
        }

        if line == MODIFIED_FLAG {
            None
        } else if !line.is_empty() {
            self.pending = Pending::Value(line.to_string());
            None
        } else {
            self.open.take().map(|record| TraceRecord {
                point: record.point,
                invocation: record.invocation,
                snapshot: record.snapshot,
            })
        }
    }
}

impl<R: BufRead> Iterator for TraceStream<R> {
    type Item = io::Result<TraceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(err)) => return Some(Err(err)),
                None => {
                    if let Some(record) = self.open.take() {
                        tracing::debug!(
                            point = %record.point,
                            variables = record.snapshot.len(),
                            "Discarding record not terminated by a blank line"
                        );
                    }
                    return None;
                }
            };
            self.line_number += 1;

            if let Some(record) = self.consume(line.trim_end_matches('\r')) {
                return Some(Ok(record));
            }
        }
    }
}
