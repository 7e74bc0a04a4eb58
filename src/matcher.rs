//!
//! Permission matching.
//! A pure function from the current permission set and a resolved rule to an
//! allow/deny answer. No state, no side effects.

use crate::types::{PermissionSet, Rule};

/// Checks whether `have` satisfies the resolved rule `need`.
///
/// * `Literal(t)` - `t` must be present in `have`.
/// * `AnyOf(ts)` - at least one of `ts` must be present. An empty list can never be satisfied.
/// * `Alias(_)` - an alias that survived resolution is not a requirement we can test, so it
///   never matches.
///
/// Token comparison is exact and case-sensitive.
#[inline]
pub fn matches(have: &PermissionSet, need: &Rule) -> bool {
    match need {
        Rule::Literal(token) => have.contains(token),
        Rule::AnyOf(tokens) => tokens.iter().any(|t| have.contains(t)),
        Rule::Alias { .. } => false,
    }
}

/// Same as [`matches`] for an optional rule; `None` (rule not found) is a denial.
#[inline]
pub fn matches_opt(have: &PermissionSet, need: Option<&Rule>) -> bool {
    need.is_some_and(|rule| matches(have, rule))
}
