//! Violations and run outcomes.

use std::fmt;

use super::invariant::InvariantType;
use super::program_point::ProgramPoint;

/// Classified outcome of one fault-injection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureMode {
    /// Outcome not determined
    Undefined,
    /// Run completed with correct output
    Benign,
    /// Silent data corruption: run completed with wrong output
    Sdc,
    /// Run produced no real output
    Crash,
}

impl FailureMode {
    /// Short label used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "Undefined",
            Self::Benign => "Benign",
            Self::Sdc => "SDC",
            Self::Crash => "Crash",
        }
    }

    /// Value written in the report's `FailureMode` column.
    ///
    /// Kept in the `ErrorMode.<Label>` form that existing LLFI analysis
    /// scripts parse.
    pub const fn report_label(self) -> &'static str {
        match self {
            Self::Undefined => "ErrorMode.Undefined",
            Self::Benign => "ErrorMode.Benign",
            Self::Sdc => "ErrorMode.SDC",
            Self::Crash => "ErrorMode.Crash",
        }
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A violated invariant observed in one trace record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Trace line of the governing variable's value
    pub source_line: usize,
    /// Program point the invariant belongs to
    pub point: ProgramPoint,
    /// Verbatim predicate text
    pub predicate: String,
    /// Classified invariant type
    pub kind: InvariantType,
    /// Identifier of the trace the record came from
    pub trace_id: String,
    /// Run outcome, present only when outcome correlation is enabled
    pub failure_mode: Option<FailureMode>,
}

impl Violation {
    /// Report fields in column order.
    pub fn fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.source_line.to_string(),
            self.point.function_key(),
            self.predicate.clone(),
            self.kind.as_str().to_string(),
            self.trace_id.clone(),
        ];
        if let Some(mode) = self.failure_mode {
            fields.push(mode.report_label().to_string());
        }
        fields
    }
}
