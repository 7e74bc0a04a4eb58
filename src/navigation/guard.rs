//!
//! Pre-navigation rule enforcement.
//!
//! The guard decides once, synchronously, whether a navigation may commit:
//! the not-found path always passes, every other route must carry a rule, and
//! a route whose rule is not satisfied is redirected to the not-found path.

use tracing::debug;

use crate::error::AclError;
use crate::evaluator::Evaluator;
use crate::types::Rule;

/// Route metadata as seen by the guard.
///
/// `rule` is either the name of a global rule or a rule given inline
/// (a token or a token list).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RouteMeta {
    #[serde(default)]
    pub rule: Option<Rule>,
}

impl RouteMeta {
    pub fn new(rule: impl Into<Rule>) -> Self {
        RouteMeta { rule: Some(rule.into()) }
    }

    /// Metadata without a rule. Only valid for the not-found route.
    pub fn unguarded() -> Self {
        RouteMeta { rule: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// The bound rule is satisfied.
    Allowed,
    /// The bound rule is not satisfied; navigate to `redirect` instead.
    Denied { redirect: String },
    /// Target is the not-found path; no rule was checked.
    PassThrough,
}

impl NavigationDecision {
    /// Path the navigation commits to.
    pub fn target<'a>(&'a self, requested: &'a str) -> &'a str {
        match self {
            NavigationDecision::Allowed | NavigationDecision::PassThrough => requested,
            NavigationDecision::Denied { redirect } => redirect.as_str(),
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, NavigationDecision::Denied { .. })
    }
}

#[derive(Debug, Clone)]
pub struct NavigationGuard {
    evaluator: Evaluator,
    notfound: String,
}

impl NavigationGuard {
    pub fn new(evaluator: Evaluator, notfound: impl Into<String>) -> Self {
        NavigationGuard { evaluator, notfound: notfound.into() }
    }

    /// Guard using the evaluator's configured not-found path.
    pub fn from_evaluator(evaluator: Evaluator) -> Result<Self, AclError> {
        let notfound = evaluator.notfound().ok_or(AclError::MissingNotFound)?.to_string();
        Ok(Self::new(evaluator, notfound))
    }

    pub fn notfound(&self) -> &str {
        &self.notfound
    }

    /// Decides a navigation to `path` whose route carries `meta`.
    ///
    /// A route without a rule (other than the not-found route) is a
    /// configuration error and is reported, not redirected.
    pub fn before_navigate(&self, path: &str, meta: &RouteMeta) -> Result<NavigationDecision, AclError> {
        if path == self.notfound {
            debug!(path, "navigation to notfound passes through");
            return Ok(NavigationDecision::PassThrough);
        }

        let bound = meta
            .rule
            .as_ref()
            .ok_or_else(|| AclError::MissingRouteRule { path: path.to_string() })?;

        let rule = self.route_rule(bound);
        if self.evaluator.matches(&rule) {
            debug!(path, "navigation allowed");
            Ok(NavigationDecision::Allowed)
        } else {
            debug!(path, redirect = %self.notfound, "navigation denied");
            Ok(NavigationDecision::Denied { redirect: self.notfound.clone() })
        }
    }

    /// A bound literal naming a global rule is replaced by that rule; the
    /// resolver's alias step then applies to whatever is bound.
    fn route_rule(&self, bound: &Rule) -> Rule {
        let substituted = match bound {
            Rule::Literal(name) => self.evaluator.global_rules().get(name).unwrap_or(bound),
            other => other,
        };
        self.evaluator.resolver().expand(substituted)
    }
}
