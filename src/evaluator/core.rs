//!
//! The evaluator: process-wide permission state plus the `get` / `change` /
//! `check` contract exposed to the embedding application.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::config::{AclConfig, ChangeDetection};
use crate::error::AclError;
use crate::evaluator::subscribers::{Dispatch, PermissionObserver, SubscriptionId, Subscribers};
use crate::matcher;
use crate::resolver::{Resolution, Resolver, RuleTable};
use crate::types::{PermissionSet, Rule};

struct Shared {
    /// Current permission set. Replaced wholesale by `change`, never edited in place.
    current: RwLock<Arc<PermissionSet>>,
    subscribers: Subscribers,
    dispatch: Dispatch,
    resolver: Resolver,
    change_detection: ChangeDetection,
    notfound: Option<String>,
}

/// Owner of the current permission set.
///
/// Cloning yields another handle to the same state: a change made through any
/// handle is visible to, and notified through, all of them.
#[derive(Clone)]
pub struct Evaluator {
    shared: Arc<Shared>,
}

impl Evaluator {
    /// Builds an evaluator from configuration. The global rule table is frozen from here on.
    pub fn new(config: AclConfig) -> Self {
        let AclConfig {
            initial,
            accept_local_rules,
            global_rules,
            notfound,
            alias_depth,
            change_detection,
        } = config;
        debug!(
            initial = %initial,
            global_rules = global_rules.len(),
            accept_local_rules,
            "evaluator created"
        );
        Evaluator {
            shared: Arc::new(Shared {
                current: RwLock::new(Arc::new(initial)),
                subscribers: Subscribers::default(),
                dispatch: Dispatch::default(),
                resolver: Resolver::new(global_rules, accept_local_rules, alias_depth),
                change_detection,
                notfound,
            }),
        }
    }

    /// Snapshot of the current permission set.
    pub fn get(&self) -> Arc<PermissionSet> {
        Arc::clone(&self.shared.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replaces the current permission set and notifies every observer.
    ///
    /// Nothing happens when `next` equals the current set under the configured
    /// `ChangeDetection`. Returns whether the set was replaced.
    ///
    /// Observers are always handed the latest stored set, so the last
    /// notification an observer receives is the current set. A change made
    /// from inside an observer restarts the round in progress instead of
    /// nesting, and the outermost `change` returns once every observer has
    /// seen the final set.
    pub fn change(&self, next: impl Into<PermissionSet>) -> bool {
        let next = Arc::new(next.into());
        {
            // compare and swap under one write lock: single writer
            let mut current = self.shared.current.write().unwrap_or_else(PoisonError::into_inner);
            if !self.shared.change_detection.differs(&current, &next) {
                return false;
            }
            debug!(from = %current, to = %next, "permissions changed");
            *current = next;
        }

        let Some(turn) = self.shared.dispatch.enter() else {
            // re-entrant: the round in progress picks this set up
            return true;
        };
        loop {
            let latest = self.get();
            for observer in self.shared.subscribers.snapshot() {
                observer.on_change(&latest);
                if turn.is_dirty() {
                    break;
                }
            }
            if !turn.take_dirty() {
                break;
            }
            debug!("permissions changed during notification; restarting round");
        }
        true
    }

    /// Whether the current set satisfies the global rule `name`.
    ///
    /// Total: unknown names are denied. Local rules are never consulted here,
    /// see `LocalScope::check`.
    pub fn check(&self, name: &str) -> bool {
        match self.shared.resolver.resolve(name, None) {
            Ok(resolution) => matcher::matches_opt(&self.get(), resolution.rule()),
            Err(_) => false,
        }
    }

    /// Full check with an optional local rule table.
    ///
    /// Fails only when `name` exists solely in `local` and local rules are disabled.
    pub fn try_check(&self, name: &str, local: Option<&RuleTable>) -> Result<bool, AclError> {
        let resolution = self.shared.resolver.resolve(name, local)?;
        let allowed = matcher::matches_opt(&self.get(), resolution.rule());
        debug!(rule = name, allowed, "rule checked");
        Ok(allowed)
    }

    /// Direct resolver access (global table only).
    pub fn resolve(&self, name: &str) -> Resolution {
        // Without a local table the resolver cannot fail.
        self.shared.resolver.resolve(name, None).unwrap_or(Resolution::NotFound)
    }

    /// Whether the current set satisfies an already-resolved rule.
    pub fn matches(&self, rule: &Rule) -> bool {
        matcher::matches(&self.get(), rule)
    }

    pub fn resolver(&self) -> &Resolver {
        &self.shared.resolver
    }

    pub fn global_rules(&self) -> &RuleTable {
        self.shared.resolver.global()
    }

    pub fn notfound(&self) -> Option<&str> {
        self.shared.notfound.as_deref()
    }

    /// Registers an observer for every future change.
    pub fn subscribe<O: PermissionObserver>(&self, observer: O) -> SubscriptionId {
        self.subscribe_arc(Arc::new(observer))
    }

    pub fn subscribe_arc(&self, observer: Arc<dyn PermissionObserver>) -> SubscriptionId {
        let id = self.shared.subscribers.add(observer);
        debug!(subscription = %id, "observer subscribed");
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.len()
    }

    /// Whether two handles share the same state.
    pub fn same_state(&self, other: &Evaluator) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("current", &self.get())
            .field("resolver", &self.shared.resolver)
            .field("subscribers", &self.shared.subscribers)
            .field("change_detection", &self.shared.change_detection)
            .field("notfound", &self.shared.notfound)
            .finish()
    }
}
