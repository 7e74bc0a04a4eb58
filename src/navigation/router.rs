//! Router hook.
//!
//! `Router` is the contract a navigation-hook provider implements to receive
//! the guard. `StaticRouter` is a small in-memory router over a fixed route
//! table, enough for hosts that only need path → metadata dispatch.

use std::collections::HashMap;

use tracing::debug;

use crate::error::AclError;
use crate::navigation::guard::{NavigationDecision, NavigationGuard, RouteMeta};

/// A navigation-hook provider.
pub trait Router {
    /// Installs `guard` to run before every navigation.
    fn before_each(&mut self, guard: NavigationGuard);
}

/// Result of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: String,
    pub committed: String,
    /// `None` when no guard is installed.
    pub decision: Option<NavigationDecision>,
}

#[derive(Debug, Default)]
pub struct StaticRouter {
    routes: HashMap<String, RouteMeta>,
    guard: Option<NavigationGuard>,
    current: Option<String>,
}

impl StaticRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, path: impl Into<String>, meta: RouteMeta) -> Self {
        self.add_route(path, meta);
        self
    }

    pub fn add_route(&mut self, path: impl Into<String>, meta: RouteMeta) -> &mut Self {
        self.routes.insert(path.into(), meta);
        self
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    /// Path of the last committed navigation.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Checks that every registered route except the not-found one declares a rule.
    ///
    /// Without an installed guard there is nothing to enforce and this always succeeds.
    pub fn validate(&self) -> Result<(), AclError> {
        let Some(guard) = &self.guard else {
            return Ok(());
        };
        let mut paths: Vec<&String> = self.routes.keys().collect();
        paths.sort();
        for path in paths {
            if path != guard.notfound() && self.routes[path].rule.is_none() {
                return Err(AclError::MissingRouteRule { path: path.clone() });
            }
        }
        Ok(())
    }

    /// Navigates to `path`, running the guard first when one is installed.
    ///
    /// Unknown paths are sent to the not-found path once a guard is installed.
    pub fn navigate(&mut self, path: &str) -> Result<Navigation, AclError> {
        let decision = match &self.guard {
            None => None,
            Some(guard) => match self.routes.get(path) {
                Some(meta) => Some(guard.before_navigate(path, meta)?),
                None if path == guard.notfound() => Some(NavigationDecision::PassThrough),
                None => Some(NavigationDecision::Denied { redirect: guard.notfound().to_string() }),
            },
        };

        let committed = match &decision {
            Some(d) => d.target(path).to_string(),
            None => path.to_string(),
        };
        debug!(requested = path, committed = %committed, "navigation committed");
        self.current = Some(committed.clone());

        Ok(Navigation { requested: path.to_string(), committed, decision })
    }
}

impl Router for StaticRouter {
    fn before_each(&mut self, guard: NavigationGuard) {
        self.guard = Some(guard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AclConfig;
    use crate::evaluator::Evaluator;

    fn routes() -> StaticRouter {
        StaticRouter::new()
            .with_route("/", RouteMeta::new("public"))
            .with_route("/secret", RouteMeta::new("admin"))
            .with_route("/404", RouteMeta::unguarded())
    }

    fn install(router: &mut StaticRouter, initial: &str) -> Evaluator {
        let evaluator = Evaluator::new(
            AclConfig::new(initial)
                .with_global_rule("admin", "can_edit")
                .with_global_rule("public", vec!["guest", "can_review", "can_edit"])
                .with_notfound("/404"),
        );
        router.before_each(NavigationGuard::from_evaluator(evaluator.clone()).unwrap());
        evaluator
    }

    #[test]
    fn test_unguarded_router_commits_everything() {
        let mut router = routes().with_route("/open", RouteMeta::unguarded());
        let nav = router.navigate("/open").unwrap();
        assert_eq!(nav.committed, "/open");
        assert_eq!(nav.decision, None);
        assert!(router.validate().is_ok());
    }

    #[test]
    fn test_guarded_navigation_redirects_and_recovers() {
        let mut router = routes();
        let evaluator = install(&mut router, "can_review");

        let nav = router.navigate("/secret").unwrap();
        assert_eq!(nav.committed, "/404");
        assert_eq!(router.current(), Some("/404"));

        evaluator.change("can_edit");
        let nav = router.navigate("/secret").unwrap();
        assert_eq!(nav.decision, Some(NavigationDecision::Allowed));
        assert_eq!(router.current(), Some("/secret"));
    }

    #[test]
    fn test_unknown_path_goes_to_notfound() {
        let mut router = routes();
        install(&mut router, "can_edit");
        assert_eq!(router.navigate("/nowhere").unwrap().committed, "/404");
    }

    #[test]
    fn test_route_without_rule_fails_navigation_and_validation() {
        let mut router = routes().with_route("/open", RouteMeta::unguarded());
        install(&mut router, "can_edit");

        assert_eq!(
            router.navigate("/open").unwrap_err(),
            AclError::MissingRouteRule { path: "/open".into() }
        );
        assert_eq!(router.current(), None);
        assert!(router.validate().is_err());
    }
}
