use crate::domain::models::InvariantType;

/// Substring patterns tested against a predicate, in priority order.
///
/// The first pattern contained in the predicate decides its type. Structural
/// patterns come before bare relational operators because a predicate such
/// as `x has only one value` or `x == orig(x)` also contains operator-like
/// text.
pub const PRIORITY_TABLE: &[(&str, InvariantType)] = &[
    ("has only one value", InvariantType::Uniqueness),
    ("!= null", InvariantType::NotNull),
    ("sorted by", InvariantType::Order),
    ("one of", InvariantType::MultiValue),
    ("== orig", InvariantType::Initialization),
    ("== [", InvariantType::ArrayEquality),
    ("elements ==", InvariantType::ElementInitialization),
    ("elementwise", InvariantType::Elementwise),
    ("elements", InvariantType::Elementwise),
    ("orig", InvariantType::Initialization),
    ("return", InvariantType::ReturnValue),
    (">", InvariantType::MinimumCondition),
    ("<", InvariantType::MaximumCondition),
    ("==", InvariantType::EqualityCondition),
    ("!=", InvariantType::InequalityCondition),
];

/// Classify a predicate line.
///
/// Leading `:` scope markers are stripped; the returned text is what gets
/// stored and reported. Never fails: unmatched predicates are `Other`.
pub fn classify(text: &str) -> (String, InvariantType) {
    let normalized = text.trim_start_matches(':');
    let kind = PRIORITY_TABLE
        .iter()
        .find(|(pattern, _)| normalized.contains(pattern))
        .map_or(InvariantType::Other, |&(_, kind)| kind);

    (normalized.to_string(), kind)
}
