//! Caller-scoped access to the evaluator.
//!
//! A `LocalScope` is what one consumer (typically one UI component instance)
//! holds: a handle to the shared evaluator plus its own local rule table.

use std::sync::Arc;

use crate::error::AclError;
use crate::evaluator::{Evaluator, PermissionObserver, SubscriptionId};
use crate::resolver::RuleTable;
use crate::types::{PermissionSet, Rule};

#[derive(Debug, Clone)]
pub struct LocalScope {
    evaluator: Evaluator,
    local_rules: RuleTable,
}

impl LocalScope {
    pub fn new(evaluator: Evaluator, local_rules: RuleTable) -> Self {
        LocalScope { evaluator, local_rules }
    }

    /// A scope without local rules.
    pub fn global(evaluator: Evaluator) -> Self {
        Self::new(evaluator, RuleTable::new())
    }

    pub fn with_local_rule(mut self, name: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.local_rules.insert(name, rule);
        self
    }

    pub fn get(&self) -> Arc<PermissionSet> {
        self.evaluator.get()
    }

    pub fn change(&self, next: impl Into<PermissionSet>) -> bool {
        self.evaluator.change(next)
    }

    /// Checks `name` against the global rules, falling back to this scope's rules.
    ///
    /// Errors when the rule exists only locally and local rules are disabled.
    pub fn check(&self, name: &str) -> Result<bool, AclError> {
        self.evaluator.try_check(name, Some(&self.local_rules))
    }

    /// Subscribes an observer on behalf of this scope (e.g. to trigger a re-render).
    pub fn on_change<O: PermissionObserver>(&self, observer: O) -> SubscriptionId {
        self.evaluator.subscribe(observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AclConfig;

    #[test]
    fn test_local_rule_checked_when_enabled() {
        let evaluator = Evaluator::new(AclConfig::new("can_delete").accept_local_rules(true));
        let scope = LocalScope::global(evaluator).with_local_rule("owner", "can_delete");
        assert_eq!(scope.check("owner"), Ok(true));
        assert_eq!(scope.check("unknown"), Ok(false));
    }

    #[test]
    fn test_local_rule_rejected_when_disabled() {
        let evaluator = Evaluator::new(AclConfig::new("can_delete"));
        let scope = LocalScope::global(evaluator).with_local_rule("owner", "can_delete");
        assert!(matches!(scope.check("owner"), Err(AclError::LocalRulesDisabled { .. })));
    }

    #[test]
    fn test_on_change_fires_for_changes_from_any_scope() {
        let evaluator = Evaluator::new(AclConfig::new("guest").with_global_rule("admin", "can_edit"));
        let watcher = LocalScope::global(evaluator.clone());
        let writer = LocalScope::global(evaluator);

        let renders = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = Arc::clone(&renders);
        let view = watcher.clone();
        let id = watcher.on_change(move |_: &PermissionSet| {
            // Re-render: re-evaluate what depends on `check`.
            log.lock().unwrap().push(view.check("admin"));
        });

        writer.change("can_edit");
        writer.change("can_edit");
        writer.change("guest");
        assert_eq!(*renders.lock().unwrap(), vec![Ok(true), Ok(false)]);
        assert!(writer.evaluator.unsubscribe(id));
    }

    #[test]
    fn test_scopes_share_state_but_not_rules() {
        let evaluator = Evaluator::new(
            AclConfig::new("guest").accept_local_rules(true).with_global_rule("admin", "can_edit"),
        );
        let a = LocalScope::global(evaluator.clone()).with_local_rule("owner", "can_delete");
        let b = LocalScope::global(evaluator);

        a.change(["can_edit", "can_delete"]);
        assert_eq!(b.check("admin"), Ok(true));
        assert_eq!(a.check("owner"), Ok(true));
        assert_eq!(b.check("owner"), Ok(false));
        assert_eq!(b.get().len(), 2);
    }
}
