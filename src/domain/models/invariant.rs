//! Typed invariants and the per-program-point catalog.

use std::collections::HashMap;
use std::fmt;

use super::program_point::ProgramPoint;

/// Closed set of invariant kinds a predicate can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantType {
    /// `x has only one value`
    Uniqueness,
    /// `x != null`
    NotNull,
    /// `x[] sorted by <`
    Order,
    /// `x one of { 1, 2, 3 }`
    MultiValue,
    /// `x == orig(x)`
    Initialization,
    /// `x == [1, 2, 3]`
    ArrayEquality,
    /// `x[] elements == 0`
    ElementInitialization,
    /// `x[] elements > 0`, `x[] < y[] (elementwise)`
    Elementwise,
    /// `return > 0`
    ReturnValue,
    /// `x > 0`, `x >= y`
    MinimumCondition,
    /// `x < 10`
    MaximumCondition,
    /// `x == y`
    EqualityCondition,
    /// `x != 0`
    InequalityCondition,
    /// Anything else; never evaluated.
    Other,
}

impl InvariantType {
    /// Tag used in the report's `Class` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uniqueness => "uniqueness",
            Self::NotNull => "not-null",
            Self::Order => "order",
            Self::MultiValue => "multi-value",
            Self::Initialization => "initialization",
            Self::ArrayEquality => "array-equality",
            Self::ElementInitialization => "element-initialization",
            Self::Elementwise => "elementwise",
            Self::ReturnValue => "return-value",
            Self::MinimumCondition => "minimum-condition",
            Self::MaximumCondition => "maximum-condition",
            Self::EqualityCondition => "equality-condition",
            Self::InequalityCondition => "inequality-condition",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for InvariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified predicate from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invariant {
    predicate: String,
    kind: InvariantType,
}

impl Invariant {
    /// Create an invariant from its predicate text and type.
    pub fn new(predicate: impl Into<String>, kind: InvariantType) -> Self {
        Self {
            predicate: predicate.into(),
            kind,
        }
    }

    /// Verbatim predicate text.
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// Classified type.
    pub const fn kind(&self) -> InvariantType {
        self.kind
    }

    /// The variable the predicate constrains: its first whitespace token.
    pub fn governing_variable(&self) -> &str {
        self.predicate.split(' ').next().unwrap_or_default()
    }
}

/// Read-only mapping from program point to its non-empty invariant list.
#[derive(Debug, Clone, Default)]
pub struct InvariantCatalog {
    points: HashMap<ProgramPoint, Vec<Invariant>>,
}

impl InvariantCatalog {
    /// Build a catalog, dropping points that carry no invariants.
    pub fn new(entries: impl IntoIterator<Item = (ProgramPoint, Vec<Invariant>)>) -> Self {
        let points = entries
            .into_iter()
            .filter(|(_, invariants)| !invariants.is_empty())
            .collect();
        Self { points }
    }

    /// Invariants registered for `point`, if any.
    pub fn invariants_for(&self, point: &ProgramPoint) -> Option<&[Invariant]> {
        self.points.get(point).map(Vec::as_slice)
    }

    /// Number of program points with at least one invariant.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Total number of invariants across all points.
    pub fn invariant_count(&self) -> usize {
        self.points.values().map(Vec::len).sum()
    }

    /// Whether the catalog has no program points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::program_point::Phase;

    #[test]
    fn test_empty_points_dropped() {
        let kept = ProgramPoint::new("foo", Phase::Enter);
        let dropped = ProgramPoint::new("bar", Phase::Exit);
        let catalog = InvariantCatalog::new(vec![
            (
                kept.clone(),
                vec![Invariant::new("x > 0", InvariantType::MinimumCondition)],
            ),
            (dropped.clone(), vec![]),
        ]);

        assert_eq!(catalog.point_count(), 1);
        assert!(catalog.invariants_for(&kept).is_some());
        assert!(catalog.invariants_for(&dropped).is_none());
    }

    #[test]
    fn test_governing_variable() {
        let inv = Invariant::new("arr[] elements >= 0", InvariantType::Elementwise);
        assert_eq!(inv.governing_variable(), "arr[]");
    }
}
