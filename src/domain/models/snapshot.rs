//! Per-invocation variable snapshots produced by the trace stream.

use std::collections::HashMap;

use super::program_point::ProgramPoint;

/// A raw value as recorded in the trace, with the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedValue {
    /// Value text exactly as written in the trace
    pub raw: String,
    /// 1-based line number of the value line
    pub line: usize,
}

/// Variable values captured for one invocation at one program point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSnapshot {
    values: HashMap<String, CapturedValue>,
}

impl VariableSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name = raw` seen at `line`; a later record replaces an earlier one.
    pub fn insert(&mut self, name: impl Into<String>, raw: impl Into<String>, line: usize) {
        self.values.insert(
            name.into(),
            CapturedValue {
                raw: raw.into(),
                line,
            },
        );
    }

    /// Look up a variable.
    pub fn get(&self, name: &str) -> Option<&CapturedValue> {
        self.values.get(name)
    }

    /// Iterate over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CapturedValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of captured variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A finalized trace record: one program point visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    /// Program point of the record (exit points normalized)
    pub point: ProgramPoint,
    /// Invocation nonce, if the record carried one
    pub invocation: Option<String>,
    /// Captured variable values
    pub snapshot: VariableSnapshot,
}
