//! Invariant evaluation against trace snapshots.
//!
//! Each invariant evaluates to a [`Verdict`]. Only [`Verdict::Violated`]
//! produces a report row: an invariant whose inputs cannot be resolved or
//! compared is [`Verdict::Undetermined`] and counts as holding, since the
//! trace cannot disprove it.

use crate::domain::models::value::{parse_catalog_sequence, parse_trace_sequence, sequences_equal};
use crate::domain::models::{
    CapturedValue, FailureMode, Invariant, InvariantCatalog, InvariantType, ProgramPoint, RelOp,
    ScalarValue, TraceRecord, VariableSnapshot, Violation,
};
use crate::services::origin_store::OriginValueStore;

/// Raw values that mark a recorded variable as having no value.
const NULL_MARKERS: &[&str] = &["", "null", "nonsensical"];

/// Outcome of checking one invariant against one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The captured values satisfy the invariant
    Holds,
    /// The captured values contradict the invariant
    Violated,
    /// The invariant could not be decided; treated as holding
    Undetermined(Undetermined),
}

impl Verdict {
    /// Whether this verdict produces a violation.
    ///
    /// Undetermined verdicts never do.
    pub const fn is_violation(&self) -> bool {
        matches!(self, Self::Violated)
    }

    fn from_check(result: Option<bool>) -> Self {
        match result {
            Some(true) => Self::Holds,
            Some(false) => Self::Violated,
            None => Self::Undetermined(Undetermined::Incomparable),
        }
    }
}

/// Why an invariant could not be decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Undetermined {
    /// Type `other` is never evaluated
    NotEvaluated,
    /// The governing variable was not captured in this record
    MissingValue,
    /// The right-hand operand could not be resolved
    Unresolved(UnresolvedOperand),
    /// A value did not match the expected grammar
    Unparseable,
    /// Values of incompatible kinds (text vs number)
    Incomparable,
    /// Elementwise operands of different lengths
    LengthMismatch,
    /// The predicate text does not have a supported shape
    UnsupportedShape,
}

/// An operand reference that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedOperand {
    /// `orig(var)` with no recorded entry value for this invocation
    MissingOrigin(String),
    /// A variable name absent from the current snapshot
    UnknownVariable(String),
}

/// Result of resolving a right-hand operand token to its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Raw operand text in trace grammar (or the literal itself)
    Resolved(String),
    /// The reference could not be followed
    Unresolved(UnresolvedOperand),
}

/// Everything an invariant can refer to while it is checked.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Invocation nonce of the record
    pub invocation: Option<&'a str>,
    /// Program point of the record
    pub point: &'a ProgramPoint,
    /// Values captured in the record
    pub snapshot: &'a VariableSnapshot,
    /// Entry values recorded so far
    pub origins: &'a OriginValueStore,
}

impl<'a> EvaluationContext<'a> {
    /// Build a context for a finalized record.
    pub fn for_record(record: &'a TraceRecord, origins: &'a OriginValueStore) -> Self {
        Self {
            invocation: record.invocation.as_deref(),
            point: &record.point,
            snapshot: &record.snapshot,
            origins,
        }
    }

    /// Resolve an operand: literal, then `orig(var)`, then snapshot variable.
    pub fn resolve(&self, token: &str) -> Resolution {
        if is_literal(token) {
            return Resolution::Resolved(token.to_string());
        }
        if let Some(variable) = origin_reference(token) {
            return self
                .origins
                .lookup(self.invocation, self.point.qualified_name(), variable)
                .map_or_else(
                    || Resolution::Unresolved(UnresolvedOperand::MissingOrigin(variable.to_string())),
                    |raw| Resolution::Resolved(raw.to_string()),
                );
        }
        self.snapshot.get(token).map_or_else(
            || Resolution::Unresolved(UnresolvedOperand::UnknownVariable(token.to_string())),
            |value| Resolution::Resolved(value.raw.clone()),
        )
    }
}

fn is_literal(token: &str) -> bool {
    ScalarValue::parse_numeric(token).is_some()
        || (token.len() >= 2 && token.starts_with('"') && token.ends_with('"'))
}

/// Variable named by an `orig(var)` token.
fn origin_reference(token: &str) -> Option<&str> {
    token.strip_prefix("orig(")?.strip_suffix(')')
}

/// Checks trace records against the invariants of an immutable catalog.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'c> {
    catalog: &'c InvariantCatalog,
}

impl<'c> Evaluator<'c> {
    /// Create an evaluator over `catalog`.
    pub const fn new(catalog: &'c InvariantCatalog) -> Self {
        Self { catalog }
    }

    /// Check every invariant registered for the record's program point.
    ///
    /// Points without catalog entries yield no violations.
    pub fn evaluate(
        &self,
        record: &TraceRecord,
        origins: &OriginValueStore,
        trace_id: &str,
        failure_mode: Option<FailureMode>,
    ) -> Vec<Violation> {
        let Some(invariants) = self.catalog.invariants_for(&record.point) else {
            return Vec::new();
        };
        let ctx = EvaluationContext::for_record(record, origins);

        invariants
            .iter()
            .filter_map(|invariant| {
                let verdict = check(invariant, &ctx);
                if let Verdict::Undetermined(reason) = &verdict {
                    tracing::trace!(
                        point = %record.point,
                        predicate = invariant.predicate(),
                        ?reason,
                        "Invariant undetermined, treating as holding"
                    );
                }
                if !verdict.is_violation() {
                    return None;
                }
                let source_line = record
                    .snapshot
                    .get(invariant.governing_variable())
                    .map_or(0, |value| value.line);
                Some(Violation {
                    source_line,
                    point: record.point.clone(),
                    predicate: invariant.predicate().to_string(),
                    kind: invariant.kind(),
                    trace_id: trace_id.to_string(),
                    failure_mode,
                })
            })
            .collect()
    }
}

/// Check one invariant.
pub fn check(invariant: &Invariant, ctx: &EvaluationContext<'_>) -> Verdict {
    if invariant.kind() == InvariantType::Other {
        return Verdict::Undetermined(Undetermined::NotEvaluated);
    }
    let Some(value) = ctx.snapshot.get(invariant.governing_variable()) else {
        return Verdict::Undetermined(Undetermined::MissingValue);
    };
    let predicate = invariant.predicate();

    match invariant.kind() {
        InvariantType::Uniqueness => Verdict::Holds,
        InvariantType::NotNull => check_not_null(value),
        InvariantType::Order => check_order(predicate, value),
        InvariantType::MultiValue => check_multi_value(predicate, value),
        InvariantType::ArrayEquality => check_array_equality(predicate, value),
        InvariantType::Elementwise | InvariantType::ElementInitialization => {
            check_elementwise(predicate, value, ctx)
        }
        InvariantType::Initialization
        | InvariantType::ReturnValue
        | InvariantType::MinimumCondition
        | InvariantType::MaximumCondition
        | InvariantType::EqualityCondition
        | InvariantType::InequalityCondition => check_scalar_condition(predicate, value, ctx),
        InvariantType::Other => Verdict::Undetermined(Undetermined::NotEvaluated),
    }
}

fn check_not_null(value: &CapturedValue) -> Verdict {
    if NULL_MARKERS.contains(&value.raw.trim()) {
        Verdict::Violated
    } else {
        Verdict::Holds
    }
}

/// `a[] sorted by <` (non-decreasing) or `a[] sorted by >` (non-increasing).
fn check_order(predicate: &str, value: &CapturedValue) -> Verdict {
    let op = match predicate.split_whitespace().last() {
        Some(op) if op.starts_with('<') => RelOp::Le,
        Some(op) if op.starts_with('>') => RelOp::Ge,
        _ => return Verdict::Undetermined(Undetermined::UnsupportedShape),
    };
    let Some(sequence) = parse_trace_sequence(&value.raw) else {
        return Verdict::Undetermined(Undetermined::Unparseable);
    };

    compare_each(sequence.windows(2).map(|pair| (&pair[0], &pair[1])), op)
}

/// `x one of { 1, 2, 3 }` or `a[] one of { [1, 2], [3, 4] }`.
fn check_multi_value(predicate: &str, value: &CapturedValue) -> Verdict {
    let Some((_, set)) = predicate.rsplit_once('{') else {
        return Verdict::Undetermined(Undetermined::UnsupportedShape);
    };
    let set = set.trim_matches(|c: char| c == '}' || c == ' ');

    if set.contains('[') {
        let Some(sequence) = parse_trace_sequence(&value.raw) else {
            return Verdict::Undetermined(Undetermined::Unparseable);
        };
        let candidates: Option<Vec<_>> = set.split("],").map(parse_catalog_sequence).collect();
        let Some(candidates) = candidates else {
            return Verdict::Undetermined(Undetermined::Unparseable);
        };
        membership(candidates.iter().map(|c| sequences_equal(&sequence, c)))
    } else {
        let scalar = ScalarValue::parse(&value.raw);
        membership(
            set.split(',')
                .map(ScalarValue::parse)
                .map(|candidate| scalar.equals(&candidate)),
        )
    }
}

/// Any match holds; otherwise an incomparable candidate leaves it undecided.
fn membership(results: impl Iterator<Item = Option<bool>>) -> Verdict {
    let mut undecided = false;
    for result in results {
        match result {
            Some(true) => return Verdict::Holds,
            Some(false) => {}
            None => undecided = true,
        }
    }
    if undecided {
        Verdict::Undetermined(Undetermined::Incomparable)
    } else {
        Verdict::Violated
    }
}

/// `a[] == [1, 2, 3]`
fn check_array_equality(predicate: &str, value: &CapturedValue) -> Verdict {
    let Some((_, literal)) = predicate.split_once("== [") else {
        return Verdict::Undetermined(Undetermined::UnsupportedShape);
    };
    let (Some(expected), Some(actual)) = (
        parse_catalog_sequence(literal),
        parse_trace_sequence(&value.raw),
    ) else {
        return Verdict::Undetermined(Undetermined::Unparseable);
    };
    Verdict::from_check(sequences_equal(&expected, &actual))
}

/// `a[] elements OP operand` or `a[] OP b[] (elementwise)`.
fn check_elementwise(predicate: &str, value: &CapturedValue, ctx: &EvaluationContext<'_>) -> Verdict {
    let tokens: Vec<&str> = predicate.split_whitespace().collect();
    let (op, operand) = match tokens.as_slice() {
        [_, "elements", op, operand] => (*op, *operand),
        [_, op, operand, "(elementwise)"] => (*op, *operand),
        _ => return Verdict::Undetermined(Undetermined::UnsupportedShape),
    };
    let Some(op) = RelOp::parse(op) else {
        return Verdict::Undetermined(Undetermined::UnsupportedShape);
    };
    let Some(elements) = parse_trace_sequence(&value.raw) else {
        return Verdict::Undetermined(Undetermined::Unparseable);
    };
    let raw = match ctx.resolve(operand) {
        Resolution::Resolved(raw) => raw,
        Resolution::Unresolved(unresolved) => {
            return Verdict::Undetermined(Undetermined::Unresolved(unresolved))
        }
    };

    if raw.trim_start().starts_with('[') {
        let Some(others) = parse_trace_sequence(&raw) else {
            return Verdict::Undetermined(Undetermined::Unparseable);
        };
        if others.len() != elements.len() {
            return Verdict::Undetermined(Undetermined::LengthMismatch);
        }
        compare_each(elements.iter().zip(others.iter()), op)
    } else {
        let rhs = ScalarValue::parse(&raw);
        compare_each(elements.iter().map(|lhs| (lhs, &rhs)), op)
    }
}

/// Apply `op` pair by pair, stopping at the first mismatch.
fn compare_each<'v>(
    pairs: impl Iterator<Item = (&'v ScalarValue, &'v ScalarValue)>,
    op: RelOp,
) -> Verdict {
    for (lhs, rhs) in pairs {
        match op.apply(lhs, rhs) {
            Some(true) => {}
            Some(false) => return Verdict::Violated,
            None => return Verdict::Undetermined(Undetermined::Incomparable),
        }
    }
    Verdict::Holds
}

/// `x OP operand` where the operand is a literal, `orig(var)` or a variable.
fn check_scalar_condition(
    predicate: &str,
    value: &CapturedValue,
    ctx: &EvaluationContext<'_>,
) -> Verdict {
    let tokens: Vec<&str> = predicate.split_whitespace().collect();
    let [_, op, operand] = tokens.as_slice() else {
        return Verdict::Undetermined(Undetermined::UnsupportedShape);
    };
    let Some(op) = RelOp::parse(op) else {
        return Verdict::Undetermined(Undetermined::UnsupportedShape);
    };
    match ctx.resolve(operand) {
        Resolution::Resolved(raw) => Verdict::from_check(op.apply(
            &ScalarValue::parse(&value.raw),
            &ScalarValue::parse(&raw),
        )),
        Resolution::Unresolved(unresolved) => {
            Verdict::Undetermined(Undetermined::Unresolved(unresolved))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{OriginScope, Phase};
    use crate::services::predicate_classifier::classify;

    fn invariant(text: &str) -> Invariant {
        let (predicate, kind) = classify(text);
        Invariant::new(predicate, kind)
    }

    fn record(phase: Phase, invocation: &str, values: &[(&str, &str)]) -> TraceRecord {
        let mut snapshot = VariableSnapshot::new();
        for (line, (name, raw)) in values.iter().enumerate() {
            snapshot.insert(*name, *raw, line + 10);
        }
        TraceRecord {
            point: ProgramPoint::new("foo", phase),
            invocation: Some(invocation.to_string()),
            snapshot,
        }
    }

    fn verdict_with(text: &str, record: &TraceRecord, origins: &OriginValueStore) -> Verdict {
        check(&invariant(text), &EvaluationContext::for_record(record, origins))
    }

    fn verdict(text: &str, values: &[(&str, &str)]) -> Verdict {
        let origins = OriginValueStore::new(OriginScope::PerFile);
        verdict_with(text, &record(Phase::Enter, "1", values), &origins)
    }

    #[test]
    fn test_scalar_conditions() {
        assert_eq!(verdict("x > 0", &[("x", "5")]), Verdict::Holds);
        assert_eq!(verdict("x > 0", &[("x", "-5")]), Verdict::Violated);
        assert_eq!(verdict("x <= 2.5", &[("x", "2.5")]), Verdict::Holds);
        assert_eq!(verdict("x == y", &[("x", "3"), ("y", "3")]), Verdict::Holds);
        assert_eq!(verdict("x != y", &[("x", "3"), ("y", "3")]), Verdict::Violated);
        assert_eq!(verdict("return >= 1", &[("return", "0")]), Verdict::Violated);
    }

    #[test]
    fn test_missing_governing_value_holds() {
        let result = verdict("x > 0", &[("y", "-1")]);
        assert_eq!(result, Verdict::Undetermined(Undetermined::MissingValue));
        assert!(!result.is_violation());
    }

    #[test]
    fn test_unknown_operand_variable_is_undetermined() {
        assert_eq!(
            verdict("x < y", &[("x", "1")]),
            Verdict::Undetermined(Undetermined::Unresolved(
                UnresolvedOperand::UnknownVariable("y".to_string())
            ))
        );
    }

    #[test]
    fn test_order() {
        assert_eq!(verdict("a[] sorted by <", &[("a[]", "[1 2 3]")]), Verdict::Holds);
        assert_eq!(verdict("a[] sorted by <", &[("a[]", "[3 1 2]")]), Verdict::Violated);
        assert_eq!(verdict("a[] sorted by <=", &[("a[]", "[1 1 2]")]), Verdict::Holds);
        assert_eq!(verdict("a[] sorted by >", &[("a[]", "[3 2 2]")]), Verdict::Holds);
        assert_eq!(verdict("a[] sorted by >", &[("a[]", "[1 2]")]), Verdict::Violated);
    }

    #[test]
    fn test_multi_value_scalar() {
        assert_eq!(verdict("x one of { 1, 2, 3 }", &[("x", "2")]), Verdict::Holds);
        assert_eq!(verdict("x one of { 1, 2, 3 }", &[("x", "4")]), Verdict::Violated);
    }

    #[test]
    fn test_multi_value_sequences() {
        let text = "a[] one of { [1, 2], [3, 4] }";
        assert_eq!(verdict(text, &[("a[]", "[3 4]")]), Verdict::Holds);
        assert_eq!(verdict(text, &[("a[]", "[1 3]")]), Verdict::Violated);
    }

    #[test]
    fn test_multi_value_strings() {
        let text = "s one of { \"on\", \"off\" }";
        assert_eq!(verdict(text, &[("s", "\"on\"")]), Verdict::Holds);
        assert_eq!(verdict(text, &[("s", "\"idle\"")]), Verdict::Violated);
    }

    #[test]
    fn test_nan_values_are_violations() {
        assert_eq!(verdict("x > 0.0", &[("x", "-nan")]), Verdict::Violated);
        assert_eq!(verdict("x == y", &[("x", "nan"), ("y", "nan")]), Verdict::Violated);
        assert_eq!(verdict("x != 1", &[("x", "nan")]), Verdict::Holds);

        let corrupted = [("a[]", "[ 1.000000 NaN 2.000000 ]")];
        assert_eq!(verdict("a[] elements >= 0", &corrupted), Verdict::Violated);
        assert_eq!(verdict("a[] sorted by <=", &corrupted), Verdict::Violated);
        assert_eq!(verdict("a[] sorted by >", &corrupted), Verdict::Violated);
        assert_eq!(verdict("a[] == [1, 2, 3]", &corrupted), Verdict::Violated);
    }

    #[test]
    fn test_array_equality() {
        assert_eq!(verdict("x == [1, 2, 3]", &[("x", "[1 2 3]")]), Verdict::Holds);
        assert_eq!(verdict("x == [1, 2, 3]", &[("x", "[1 2 4]")]), Verdict::Violated);
        assert_eq!(verdict("x == [1, 2, 3]", &[("x", "[1 2]")]), Verdict::Violated);
        assert_eq!(verdict("x == []", &[("x", "[]")]), Verdict::Holds);
    }

    #[test]
    fn test_elementwise_literal_and_variable() {
        assert_eq!(verdict("a[] elements >= 0", &[("a[]", "[0 1 2]")]), Verdict::Holds);
        assert_eq!(verdict("a[] elements >= 0", &[("a[]", "[0 -1 2]")]), Verdict::Violated);
        assert_eq!(verdict("a[] elements == 7", &[("a[]", "[7 7]")]), Verdict::Holds);
        assert_eq!(
            verdict("a[] elements < n", &[("a[]", "[1 2]"), ("n", "2")]),
            Verdict::Violated
        );
    }

    #[test]
    fn test_elementwise_sequences() {
        let text = "a[] < b[] (elementwise)";
        assert_eq!(
            verdict(text, &[("a[]", "[1 2]"), ("b[]", "[2 3]")]),
            Verdict::Holds
        );
        assert_eq!(
            verdict(text, &[("a[]", "[1 5]"), ("b[]", "[2 3]")]),
            Verdict::Violated
        );
        assert_eq!(
            verdict(text, &[("a[]", "[1 5]"), ("b[]", "[2]")]),
            Verdict::Undetermined(Undetermined::LengthMismatch)
        );
    }

    #[test]
    fn test_origin_reference_resolves_entry_value() {
        let mut origins = OriginValueStore::new(OriginScope::PerFile);
        origins.record_entry(&record(Phase::Enter, "7", &[("x", "4")]));

        let exit = record(Phase::Exit, "7", &[("x", "4")]);
        assert_eq!(verdict_with("x == orig(x)", &exit, &origins), Verdict::Holds);

        let exit = record(Phase::Exit, "7", &[("x", "5")]);
        assert_eq!(verdict_with("x == orig(x)", &exit, &origins), Verdict::Violated);
        assert_eq!(verdict_with("x > orig(x)", &exit, &origins), Verdict::Holds);
    }

    #[test]
    fn test_origin_without_prior_enter_holds() {
        let origins = OriginValueStore::new(OriginScope::PerFile);
        let exit = record(Phase::Exit, "7", &[("x", "5")]);
        let result = verdict_with("x == orig(x)", &exit, &origins);
        assert_eq!(
            result,
            Verdict::Undetermined(Undetermined::Unresolved(
                UnresolvedOperand::MissingOrigin("x".to_string())
            ))
        );
        assert!(!result.is_violation());
    }

    #[test]
    fn test_origin_scoped_to_invocation() {
        let mut origins = OriginValueStore::new(OriginScope::PerFile);
        origins.record_entry(&record(Phase::Enter, "1", &[("x", "4")]));
        let exit = record(Phase::Exit, "2", &[("x", "5")]);
        assert!(!verdict_with("x == orig(x)", &exit, &origins).is_violation());
    }

    #[test]
    fn test_elementwise_origin_operand() {
        let mut origins = OriginValueStore::new(OriginScope::PerFile);
        origins.record_entry(&record(Phase::Enter, "3", &[("n", "2")]));
        let exit = record(Phase::Exit, "3", &[("a[]", "[1 2 3]")]);
        assert_eq!(
            verdict_with("a[] elements <= orig(n)", &exit, &origins),
            Verdict::Violated
        );
    }

    #[test]
    fn test_not_null_and_uniqueness() {
        assert_eq!(verdict("p != null", &[("p", "0x7ffc")]), Verdict::Holds);
        assert_eq!(verdict("p != null", &[("p", "null")]), Verdict::Violated);
        assert_eq!(verdict("x has only one value", &[("x", "9")]), Verdict::Holds);
    }

    #[test]
    fn test_other_never_evaluated() {
        assert_eq!(
            verdict("x is a power of 2", &[("x", "3")]),
            Verdict::Undetermined(Undetermined::NotEvaluated)
        );
    }

    #[test]
    fn test_unsupported_shapes_hold() {
        assert_eq!(
            verdict("x + y > 0", &[("x", "-3"), ("y", "1")]),
            Verdict::Undetermined(Undetermined::UnsupportedShape)
        );
        assert!(!verdict("x > 0", &[("x", "\"abc\"")]).is_violation());
    }

    #[test]
    fn test_evaluate_emits_violation_rows() {
        let catalog = InvariantCatalog::new(vec![(
            ProgramPoint::new("foo", Phase::Enter),
            vec![invariant("x > 0"), invariant("y < 10")],
        )]);
        let evaluator = Evaluator::new(&catalog);
        let origins = OriginValueStore::new(OriginScope::PerFile);
        let rec = record(Phase::Enter, "1", &[("x", "-5"), ("y", "3")]);

        let violations = evaluator.evaluate(&rec, &origins, "42", Some(FailureMode::Crash));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].source_line, 10);
        assert_eq!(violations[0].predicate, "x > 0");
        assert_eq!(violations[0].kind, InvariantType::MinimumCondition);
        assert_eq!(violations[0].trace_id, "42");
        assert_eq!(violations[0].failure_mode, Some(FailureMode::Crash));
    }

    #[test]
    fn test_array_equality_violation_reports_value_line() {
        let catalog = InvariantCatalog::new(vec![(
            ProgramPoint::new("foo", Phase::Exit),
            vec![invariant("x == [1, 2, 3]")],
        )]);
        let evaluator = Evaluator::new(&catalog);
        let origins = OriginValueStore::new(OriginScope::PerFile);
        let mut snapshot = VariableSnapshot::new();
        snapshot.insert("n", "3", 14);
        snapshot.insert("x", "[1 2 4]", 16);
        let rec = TraceRecord {
            point: ProgramPoint::new("foo", Phase::Exit),
            invocation: Some("2".to_string()),
            snapshot,
        };

        let violations = evaluator.evaluate(&rec, &origins, "8", None);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].source_line, 16);
        assert_eq!(violations[0].kind, InvariantType::ArrayEquality);
        assert_eq!(violations[0].predicate, "x == [1, 2, 3]");
    }

    #[test]
    fn test_unknown_point_skipped() {
        let catalog = InvariantCatalog::default();
        let evaluator = Evaluator::new(&catalog);
        let origins = OriginValueStore::new(OriginScope::PerFile);
        let rec = record(Phase::Enter, "1", &[("x", "-5")]);
        assert!(evaluator.evaluate(&rec, &origins, "1", None).is_empty());
    }
}
