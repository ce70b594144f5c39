use std::collections::HashMap;

use crate::domain::models::{OriginScope, TraceRecord};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OriginKey {
    invocation: Option<String>,
    function: String,
    variable: String,
}

/// Entry-time variable values, looked up by `orig(...)` references.
///
/// Keyed by (invocation id, qualified function name, variable name). The
/// most recent ENTER record for a key wins. Whether values survive from one
/// trace file to the next is decided by the store's [`OriginScope`].
#[derive(Debug, Clone, Default)]
pub struct OriginValueStore {
    scope: OriginScope,
    values: HashMap<OriginKey, String>,
}

impl OriginValueStore {
    /// Create an empty store with the given scope.
    pub fn new(scope: OriginScope) -> Self {
        Self {
            scope,
            values: HashMap::new(),
        }
    }

    /// Copy the values of an ENTER record into the store.
    ///
    /// Records at any other phase are ignored.
    pub fn record_entry(&mut self, record: &TraceRecord) {
        if !record.point.phase().is_enter() {
            return;
        }
        let function = record.point.qualified_name();
        for (variable, value) in record.snapshot.iter() {
            self.values.insert(
                OriginKey {
                    invocation: record.invocation.clone(),
                    function: function.to_string(),
                    variable: variable.to_string(),
                },
                value.raw.clone(),
            );
        }
    }

    /// Raw entry value of `variable` for this invocation of `function`.
    pub fn lookup(&self, invocation: Option<&str>, function: &str, variable: &str) -> Option<&str> {
        self.values
            .get(&OriginKey {
                invocation: invocation.map(str::to_string),
                function: function.to_string(),
                variable: variable.to_string(),
            })
            .map(String::as_str)
    }

    /// Mark the start of a new trace file; clears the store when per-file.
    pub fn begin_file(&mut self) {
        if self.scope == OriginScope::PerFile {
            self.values.clear();
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
