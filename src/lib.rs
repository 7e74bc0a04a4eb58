#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! ACL-Core decides whether the current actor may do something.
//!
//! It holds the actor's granted permission tokens, evaluates named rules
//! (a token, an any-of token list, or an alias to another rule) against them,
//! notifies observers when the permissions change, and guards navigations
//! before they commit. Host integration (components, a concrete router) plugs
//! in through `Evaluator`, `LocalScope` and the `Router` trait.

// Permission tokens, permission sets and rules.
pub mod types;

// Pure matching of a permission set against a resolved rule.
pub mod matcher;

// Global/local rule lookup and alias indirection.
pub mod resolver;

pub mod config;

pub mod error;

// Shared permission state, change propagation and `check`.
pub mod evaluator;

pub mod scope;

pub mod navigation;

pub mod register;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::{AclConfig, ChangeDetection};
pub use error::AclError;
pub use evaluator::{Evaluator, PermissionObserver, SubscriptionId};
pub use navigation::{NavigationDecision, NavigationGuard, RouteMeta, Router, StaticRouter};
pub use register::register;
pub use resolver::{AliasDepth, Resolution, RuleTable};
pub use scope::LocalScope;
pub use types::{PermissionSet, PermissionToken, Rule};
