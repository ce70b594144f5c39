//! Program points: a function paired with an entry or exit phase.

use std::fmt;

/// Phase of a program point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Function entry (`:::ENTER`)
    Enter,
    /// Combined function exit (`:::EXIT`, or `:::EXIT0` in traces)
    Exit,
    /// A specific exit site (`:::EXIT42`)
    ExitAt(u32),
    /// Any other point kind, kept verbatim (`:::OBJECT`, `:::CLASS`, ...)
    Other(String),
}

impl Phase {
    /// Parse the suffix that follows `:::` in a header.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "ENTER" => Self::Enter,
            "EXIT" => Self::Exit,
            other => other
                .strip_prefix("EXIT")
                .and_then(|n| n.parse::<u32>().ok())
                .map_or_else(|| Self::Other(other.to_string()), Self::ExitAt),
        }
    }

    /// Fold `EXIT0` into the combined exit point.
    ///
    /// Traces record the combined exit as `EXIT0` while catalogs name it `EXIT`.
    #[must_use]
    pub fn normalize_exit(self) -> Self {
        match self {
            Self::ExitAt(0) => Self::Exit,
            other => other,
        }
    }

    /// Whether values recorded at this phase are entry-time values.
    pub const fn is_enter(&self) -> bool {
        matches!(self, Self::Enter)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enter => f.write_str("ENTER"),
            Self::Exit => f.write_str("EXIT"),
            Self::ExitAt(n) => write!(f, "EXIT{n}"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// Identity key for invariant sets and trace snapshots.
///
/// The qualified name keeps any `Scope::` prefix so that identically named
/// functions in different scopes stay distinct, both in lookups and in the
/// rendered function key, e.g. `Matrix::scale.ENTER`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramPoint {
    qualified_name: String,
    phase: Phase,
}

impl ProgramPoint {
    /// Create a program point from a qualified function name and phase.
    pub fn new(qualified_name: impl Into<String>, phase: Phase) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            phase,
        }
    }

    /// Parse a `..`-prefixed header line.
    ///
    /// Accepts `..<Scope>::<Function>(<Args>):::<PHASE>`. Headers without
    /// an argument list or phase suffix still yield a point; a missing phase
    /// becomes `Phase::Other("")`. Returns `None` if the line is not a header.
    pub fn parse_header(line: &str) -> Option<Self> {
        let body = line.strip_prefix("..")?;
        let (signature, phase) = match body.rsplit_once(":::") {
            Some((signature, phase)) => (signature, Phase::parse(phase.trim())),
            None => (body, Phase::Other(String::new())),
        };
        let qualified_name = signature
            .split_once('(')
            .map_or(signature, |(name, _)| name)
            .trim();

        Some(Self::new(qualified_name, phase))
    }

    /// Full function name including any scope prefix.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Phase of this point.
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Same point with `EXIT0` folded into `EXIT`.
    #[must_use]
    pub fn normalize_exit(self) -> Self {
        Self {
            qualified_name: self.qualified_name,
            phase: self.phase.normalize_exit(),
        }
    }

    /// The `Scope::function.PHASE` key used in reports.
    pub fn function_key(&self) -> String {
        format!("{}.{}", self.qualified_name, self.phase)
    }
}

impl fmt::Display for ProgramPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.qualified_name, self.phase)
    }
}
