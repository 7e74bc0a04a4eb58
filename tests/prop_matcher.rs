use proptest::prelude::*;
use acl_core::matcher;
use acl_core::resolver::{resolve, AliasDepth, RuleTable};
use acl_core::{AclConfig, AclError, Evaluator, PermissionSet, Rule};

fn token() -> impl Strategy<Value = String> {
    "[a-cA-C_]{1,3}"
}

fn tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(token(), 0..6)
}

proptest! {
    /// A literal matches exactly when the token is held.
    #[test]
    fn prop_literal_is_membership(have in tokens(), t in token()) {
        let set = PermissionSet::from(have.clone());
        prop_assert_eq!(matcher::matches(&set, &Rule::Literal(t.clone())), have.contains(&t));
    }

    /// A list matches exactly when it intersects the held set.
    #[test]
    fn prop_any_of_is_intersection(have in tokens(), need in tokens()) {
        let set = PermissionSet::from(have.clone());
        let expected = need.iter().any(|t| have.contains(t));
        prop_assert_eq!(matcher::matches(&set, &Rule::AnyOf(need)), expected);
    }

    /// The empty list is never satisfied.
    #[test]
    fn prop_empty_list_never_matches(have in tokens()) {
        prop_assert!(!matcher::matches(&PermissionSet::from(have), &Rule::AnyOf(Vec::new())));
    }

    /// Token order in the held set does not affect matching.
    #[test]
    fn prop_order_irrelevant_for_matching(have in tokens(), need in tokens()) {
        let mut reversed = have.clone();
        reversed.reverse();
        let rule = Rule::AnyOf(need);
        prop_assert_eq!(
            matcher::matches(&PermissionSet::from(have), &rule),
            matcher::matches(&PermissionSet::from(reversed), &rule)
        );
    }

    /// When a name exists in both tables, the global entry wins.
    #[test]
    fn prop_global_precedence(name in token(), g in token(), l in token(), allow in any::<bool>()) {
        let global = RuleTable::new().with(name.clone(), Rule::Literal(g.clone()));
        let local = RuleTable::new().with(name.clone(), Rule::Literal(l));
        let res = resolve(&name, &global, Some(&local), allow, AliasDepth::Single).unwrap();
        prop_assert_eq!(res.rule(), Some(&Rule::Literal(g)));
    }

    /// `check` never fails and unknown names are always denied.
    #[test]
    fn prop_check_is_total(have in tokens(), name in ".{0,12}") {
        let evaluator = Evaluator::new(AclConfig::new(have).with_global_rule("known", "a"));
        let allowed = evaluator.check(&name);
        if name != "known" {
            prop_assert!(!allowed);
        }
    }

    /// A local-only name with local rules disabled is an error, never a plain `false`.
    #[test]
    fn prop_local_only_disabled_is_error(have in tokens(), name in token(), rule in token()) {
        let evaluator = Evaluator::new(AclConfig::new(have));
        let local = RuleTable::new().with(name.clone(), Rule::Literal(rule));
        prop_assert_eq!(
            evaluator.try_check(&name, Some(&local)),
            Err(AclError::LocalRulesDisabled { rule: name })
        );
    }
}
