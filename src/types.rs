//!
//! Shared data types: permission tokens, permission sets and rules.
//!
//! A `PermissionSet` is what the current actor holds; a `Rule` is what an
//! operation (or a route) requires of it.

use std::fmt;

/// Opaque, case-sensitive identifier of one granted capability.
pub type PermissionToken = String;

/// Ordered sequence of granted tokens.
///
/// Order is irrelevant for matching but is kept, since change detection
/// compares sets as sequences by default (see `ChangeDetection`).
/// Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "OneOrMany")]
pub struct PermissionSet(Vec<PermissionToken>);

impl PermissionSet {
    pub fn new() -> Self {
        PermissionSet(Vec::new())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    pub fn tokens(&self) -> &[PermissionToken] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PermissionToken> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical string form: tokens joined with `,` in their stored order.
    pub fn canonical(&self) -> String {
        self.0.join(",")
    }

    /// Sorted, deduplicated copy of the tokens. Used for order-insensitive comparison.
    pub fn normalized(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.0.iter().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens.dedup();
        tokens
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.canonical())
    }
}

impl From<&str> for PermissionSet {
    fn from(token: &str) -> Self {
        PermissionSet(vec![token.to_string()])
    }
}

impl From<String> for PermissionSet {
    fn from(token: String) -> Self {
        PermissionSet(vec![token])
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(tokens: Vec<String>) -> Self {
        PermissionSet(tokens)
    }
}

impl From<Vec<&str>> for PermissionSet {
    fn from(tokens: Vec<&str>) -> Self {
        PermissionSet(tokens.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for PermissionSet {
    fn from(tokens: &[&str]) -> Self {
        PermissionSet(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PermissionSet {
    fn from(tokens: [&str; N]) -> Self {
        PermissionSet(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl FromIterator<PermissionToken> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionToken>>(iter: I) -> Self {
        PermissionSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a PermissionToken;
    type IntoIter = std::slice::Iter<'a, PermissionToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Wire form accepted wherever a permission set is configured: a single token or a list.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(PermissionToken),
    Many(Vec<PermissionToken>),
}

impl From<OneOrMany> for PermissionSet {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(token) => PermissionSet(vec![token]),
            OneOrMany::Many(tokens) => PermissionSet(tokens),
        }
    }
}

/// A requirement against the current permission set.
///
/// JSON form: `"token"` is a `Literal`, `["a", "b"]` is an `AnyOf`,
/// `{"alias": "name"}` is an `Alias` to a global rule.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Rule {
    /// The token must be present.
    Literal(PermissionToken),
    /// At least one of the tokens must be present. Empty means impossible.
    AnyOf(Vec<PermissionToken>),
    /// Name of a rule in the global rule table.
    Alias {
        alias: String,
    },
}

impl Rule {
    pub fn literal(token: impl Into<PermissionToken>) -> Self {
        Rule::Literal(token.into())
    }

    pub fn any_of<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PermissionToken>,
    {
        Rule::AnyOf(tokens.into_iter().map(Into::into).collect())
    }

    pub fn alias(name: impl Into<String>) -> Self {
        Rule::Alias { alias: name.into() }
    }

    /// Target name if this rule is an alias.
    pub fn alias_target(&self) -> Option<&str> {
        match self {
            Rule::Alias { alias } => Some(alias),
            _ => None,
        }
    }
}

impl From<&str> for Rule {
    fn from(token: &str) -> Self {
        Rule::Literal(token.to_string())
    }
}

impl From<Vec<&str>> for Rule {
    fn from(tokens: Vec<&str>) -> Self {
        Rule::any_of(tokens)
    }
}
