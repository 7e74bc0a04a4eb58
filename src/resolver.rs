//!
//! Rule resolution.
//!
//! A rule name is looked up first in the global rule table, then (when enabled)
//! in the caller's local table. Aliases are followed against the global table
//! to the depth configured by [`AliasDepth`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{trace, warn};

use crate::error::AclError;
use crate::types::Rule;

/// Mapping from rule name to [`Rule`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RuleTable(HashMap<String, Rule>);

impl RuleTable {
    pub fn new() -> Self {
        RuleTable(HashMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.insert(name, rule);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, rule: impl Into<Rule>) -> Option<Rule> {
        self.0.insert(name.into(), rule.into())
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, R: Into<Rule>> FromIterator<(K, R)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        RuleTable(iter.into_iter().map(|(k, r)| (k.into(), r.into())).collect())
    }
}

/// How far alias chains are followed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasDepth {
    /// Replace an alias by its target exactly once. A target that is itself an
    /// alias is left unresolved (and therefore denied).
    #[default]
    Single,
    /// Follow the chain until a non-alias rule, stopping on a missing target,
    /// a cycle, or after `max_hops` substitutions.
    Fixpoint {
        #[serde(rename = "maxHops")]
        max_hops: usize,
    },
}

/// Outcome of looking up a rule name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Rule),
    NotFound,
}

impl Resolution {
    pub fn rule(&self) -> Option<&Rule> {
        match self {
            Resolution::Found(rule) => Some(rule),
            Resolution::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// Substitutes alias rules by their global targets, up to `depth`.
pub fn expand_alias(rule: &Rule, global: &RuleTable, depth: AliasDepth) -> Rule {
    let max_hops = match depth {
        AliasDepth::Single => 1,
        AliasDepth::Fixpoint { max_hops } => max_hops,
    };

    let mut current = rule;
    let mut seen: HashSet<&str> = HashSet::new();
    for _ in 0..max_hops {
        let Some(name) = current.alias_target() else {
            return current.clone();
        };
        if !seen.insert(name) {
            warn!(alias = name, "alias cycle in global rules; rule denied");
            return current.clone();
        }
        match global.get(name) {
            Some(target) => current = target,
            None => {
                warn!(alias = name, "alias points to an unknown rule; rule denied");
                return current.clone();
            }
        }
    }
    if let (AliasDepth::Fixpoint { .. }, Some(name)) = (depth, current.alias_target()) {
        warn!(alias = name, max_hops, "alias chain exceeds maxHops; rule denied");
    }
    current.clone()
}

/// Resolves `name` against the global table, then the local one.
///
/// Returns `Err(AclError::LocalRulesDisabled)` when the name exists only in
/// `local` and `allow_local` is false; this is misuse, not a denial.
pub fn resolve(
    name: &str,
    global: &RuleTable,
    local: Option<&RuleTable>,
    allow_local: bool,
    depth: AliasDepth,
) -> Result<Resolution, AclError> {
    if let Some(rule) = global.get(name) {
        trace!(rule = name, scope = "global", "rule resolved");
        return Ok(Resolution::Found(expand_alias(rule, global, depth)));
    }

    if let Some(rule) = local.and_then(|table| table.get(name)) {
        if !allow_local {
            return Err(AclError::LocalRulesDisabled { rule: name.to_string() });
        }
        trace!(rule = name, scope = "local", "rule resolved");
        return Ok(Resolution::Found(expand_alias(rule, global, depth)));
    }

    trace!(rule = name, "rule not found");
    Ok(Resolution::NotFound)
}

/// The global half of resolution, bundled with its settings.
///
/// The global table is shared and never mutated once a `Resolver` exists.
#[derive(Debug, Clone)]
pub struct Resolver {
    global: Arc<RuleTable>,
    accept_local: bool,
    depth: AliasDepth,
}

impl Resolver {
    pub fn new(global: RuleTable, accept_local: bool, depth: AliasDepth) -> Self {
        Resolver { global: Arc::new(global), accept_local, depth }
    }

    pub fn global(&self) -> &RuleTable {
        &self.global
    }

    pub fn resolve(&self, name: &str, local: Option<&RuleTable>) -> Result<Resolution, AclError> {
        resolve(name, &self.global, local, self.accept_local, self.depth)
    }

    pub fn expand(&self, rule: &Rule) -> Rule {
        expand_alias(rule, &self.global, self.depth)
    }
}
