//! Captured values, value sequences and relational operators.
//!
//! Two sequence grammars exist side by side: traces write `[1 2 3]`
//! (space separated) while catalog literals read `[1, 2, 3]`.

use std::cmp::Ordering;
use std::fmt;

/// A scalar value parsed from a trace or catalog token.
///
/// Parsing prefers an integer, falls back to floating point, and keeps
/// anything else as verbatim text.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// Integral value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// Non-numeric text, compared only for equality
    Text(String),
}

impl ScalarValue {
    /// Parse a raw token.
    pub fn parse(raw: &str) -> Self {
        let token = raw.trim();
        if let Ok(int) = token.parse::<i64>() {
            return Self::Int(int);
        }
        if let Ok(float) = token.parse::<f64>() {
            return Self::Float(float);
        }
        Self::Text(token.to_string())
    }

    /// Parse a raw token, accepting only numbers.
    pub fn parse_numeric(raw: &str) -> Option<Self> {
        match Self::parse(raw) {
            Self::Text(_) => None,
            number => Some(number),
        }
    }

    /// Whether this value is an integer or float.
    pub const fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    /// Numeric ordering; `None` for text or NaN.
    #[allow(clippy::cast_precision_loss)]
    pub fn numeric_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    /// Equality across the numeric kinds, and between texts.
    ///
    /// `None` only for text against number. NaN is unequal to everything,
    /// itself included.
    pub fn equals(&self, other: &Self) -> Option<bool> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a == b),
            (Self::Text(_), _) | (_, Self::Text(_)) => None,
            _ => Some(self.numeric_cmp(other).is_some_and(Ordering::is_eq)),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Parse a trace-originated sequence such as `[1 2 3]`.
///
/// Returns `None` if any element is not numeric.
pub fn parse_trace_sequence(raw: &str) -> Option<Vec<ScalarValue>> {
    raw.trim_matches(|c: char| c == '[' || c == ']' || c.is_whitespace())
        .split_whitespace()
        .map(ScalarValue::parse_numeric)
        .collect()
}

/// Parse a catalog-originated literal sequence such as `[1, 2, 3]`.
///
/// Returns `None` if any element is not numeric.
pub fn parse_catalog_sequence(raw: &str) -> Option<Vec<ScalarValue>> {
    let body = raw.trim_matches(|c: char| c == '[' || c == ']' || c.is_whitespace());
    if body.is_empty() {
        return Some(Vec::new());
    }
    body.split(',').map(ScalarValue::parse_numeric).collect()
}

/// Pairwise equality of two sequences.
///
/// `Some(false)` on a length mismatch, `None` if any pair is incomparable.
pub fn sequences_equal(a: &[ScalarValue], b: &[ScalarValue]) -> Option<bool> {
    if a.len() != b.len() {
        return Some(false);
    }
    let mut all_equal = true;
    for (x, y) in a.iter().zip(b) {
        if !x.equals(y)? {
            all_equal = false;
        }
    }
    Some(all_equal)
}

/// Relational operator extracted from a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl RelOp {
    /// Parse an operator token.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }

    /// Apply `lhs OP rhs` with IEEE semantics.
    ///
    /// A NaN operand makes every operator false except `!=`. `None` only
    /// when text meets a number, or text is ordered.
    pub fn apply(self, lhs: &ScalarValue, rhs: &ScalarValue) -> Option<bool> {
        let ordered = |test: fn(Ordering) -> bool| {
            if !lhs.is_numeric() || !rhs.is_numeric() {
                return None;
            }
            Some(lhs.numeric_cmp(rhs).is_some_and(test))
        };
        match self {
            Self::Eq => lhs.equals(rhs),
            Self::Ne => lhs.equals(rhs).map(|eq| !eq),
            Self::Lt => ordered(Ordering::is_lt),
            Self::Le => ordered(Ordering::is_le),
            Self::Gt => ordered(Ordering::is_gt),
            Self::Ge => ordered(Ordering::is_ge),
        }
    }

    /// Operator token as written in predicates.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
