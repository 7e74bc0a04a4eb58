//!
//! Evaluator configuration.
//!
//! Field names follow the plugin options the host applications already use
//! (`initial`, `acceptLocalRules`, `globalRules`, `notfound`), so an existing
//! JSON options object can be loaded as-is.

use std::path::Path;

use crate::error::AclError;
use crate::resolver::{AliasDepth, RuleTable};
use crate::types::{PermissionSet, Rule};

/// How `Evaluator::change` decides whether the permission set changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDetection {
    /// Sequences are compared element by element; reordering counts as a change.
    #[default]
    Ordered,
    /// Sets are compared as sorted, deduplicated token lists.
    Unordered,
}

impl ChangeDetection {
    pub fn differs(self, current: &PermissionSet, next: &PermissionSet) -> bool {
        match self {
            ChangeDetection::Ordered => current.tokens() != next.tokens(),
            ChangeDetection::Unordered => current.normalized() != next.normalized(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclConfig {
    /// Starting permission set; a single token or a list.
    #[serde(default)]
    pub initial: PermissionSet,
    /// Enables the local-rule fallback of `check`.
    #[serde(default)]
    pub accept_local_rules: bool,
    #[serde(default)]
    pub global_rules: RuleTable,
    /// Path that bypasses the navigation guard and receives denied navigations.
    #[serde(default)]
    pub notfound: Option<String>,
    #[serde(default)]
    pub alias_depth: AliasDepth,
    #[serde(default)]
    pub change_detection: ChangeDetection,
}

impl AclConfig {
    pub fn new(initial: impl Into<PermissionSet>) -> Self {
        AclConfig { initial: initial.into(), ..Default::default() }
    }

    pub fn from_json_str(json: &str) -> Result<Self, AclError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AclError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn with_global_rule(mut self, name: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.global_rules.insert(name, rule);
        self
    }

    pub fn with_global_rules(mut self, rules: RuleTable) -> Self {
        self.global_rules = rules;
        self
    }

    pub fn accept_local_rules(mut self, accept: bool) -> Self {
        self.accept_local_rules = accept;
        self
    }

    pub fn with_notfound(mut self, path: impl Into<String>) -> Self {
        self.notfound = Some(path.into());
        self
    }

    pub fn with_alias_depth(mut self, depth: AliasDepth) -> Self {
        self.alias_depth = depth;
        self
    }

    pub fn with_change_detection(mut self, mode: ChangeDetection) -> Self {
        self.change_detection = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const OPTIONS: &str = r#"{
        "initial": "can_review",
        "acceptLocalRules": true,
        "globalRules": {
            "admin": "can_edit",
            "editor": ["can_edit", "can_review"],
            "boss": { "alias": "admin" }
        },
        "notfound": "/404"
    }"#;

    #[test]
    fn test_parse_plugin_options() {
        let cfg = AclConfig::from_json_str(OPTIONS).unwrap();
        assert_eq!(cfg.initial, PermissionSet::from("can_review"));
        assert!(cfg.accept_local_rules);
        assert_eq!(cfg.global_rules.len(), 3);
        assert_eq!(cfg.global_rules.get("boss"), Some(&Rule::alias("admin")));
        assert_eq!(cfg.notfound.as_deref(), Some("/404"));
        assert_eq!(cfg.alias_depth, AliasDepth::Single);
        assert_eq!(cfg.change_detection, ChangeDetection::Ordered);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let cfg = AclConfig::from_json_str("{}").unwrap();
        assert!(cfg.initial.is_empty());
        assert!(!cfg.accept_local_rules);
        assert!(cfg.global_rules.is_empty());
        assert!(cfg.notfound.is_none());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = AclConfig::from_json_str("{\"initial\": 3}").unwrap_err();
        assert!(matches!(err, AclError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(OPTIONS.as_bytes()).unwrap();
        let cfg = AclConfig::from_path(file.path()).unwrap();
        assert_eq!(cfg.global_rules.get("admin"), Some(&Rule::literal("can_edit")));

        let missing = AclConfig::from_path(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(AclError::Io(_))));
    }

    #[test]
    fn test_change_detection_modes() {
        let ab = PermissionSet::from(["a", "b"]);
        let ba = PermissionSet::from(["b", "a"]);
        assert!(ChangeDetection::Ordered.differs(&ab, &ba));
        assert!(!ChangeDetection::Unordered.differs(&ab, &ba));
        assert!(!ChangeDetection::Ordered.differs(&ab, &ab.clone()));
        // Sequence comparison, not the joined string.
        let joined = PermissionSet::from("a,b");
        assert!(ChangeDetection::Ordered.differs(&ab, &joined));
    }
}
