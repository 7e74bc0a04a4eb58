//!
//! Defines error types for the ACL evaluator.
//!
//! Only configuration errors are errors. A rule that is not satisfied, or a
//! rule name nobody defined, is a denial and surfaces as `false` (or as a
//! redirect from the navigation guard), never as an `AclError`.

/// Fatal misconfiguration of the embedding application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AclError {
    /// A rule exists only in a local table but local rules are not enabled.
    #[error("rule `{rule}` is local but acceptLocalRules is not enabled")]
    LocalRulesDisabled { rule: String },
    /// A navigable route does not declare a rule in its metadata.
    #[error("route `{path}` does not declare a rule")]
    MissingRouteRule { path: String },
    /// A router was supplied but no not-found path was configured.
    #[error("a router was supplied without a notfound path")]
    MissingNotFound,
    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The configuration file could not be read.
    #[error("could not read configuration: {0}")]
    Io(String),
}

impl From<serde_json::Error> for AclError {
    fn from(err: serde_json::Error) -> Self {
        AclError::InvalidConfig(err.to_string())
    }
}

impl From<std::io::Error> for AclError {
    fn from(err: std::io::Error) -> Self {
        AclError::Io(err.to_string())
    }
}
