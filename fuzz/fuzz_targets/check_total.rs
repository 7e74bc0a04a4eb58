#![no_main]

// Harness: check_total
// Arbitrary rule tables, permission sets and alias depths; `check` must never panic
// and names absent from the global table must be denied.

use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use acl_core::{AclConfig, AliasDepth, Evaluator, Rule, RuleTable};

#[derive(Arbitrary, Debug, Clone)]
enum RuleFrame {
    Literal(String),
    AnyOf(Vec<String>),
    Alias(String),
}

#[derive(Arbitrary, Debug, Clone)]
struct CheckFrame {
    held: Vec<String>,
    rules: Vec<(String, RuleFrame)>,
    max_hops: Option<u8>,
    queries: Vec<String>,
    changes: Vec<Vec<String>>,
}

fn to_rule(frame: RuleFrame) -> Rule {
    match frame {
        RuleFrame::Literal(t) => Rule::Literal(t),
        RuleFrame::AnyOf(ts) => Rule::AnyOf(ts),
        RuleFrame::Alias(name) => Rule::alias(name),
    }
}

fuzz_target!(|frame: CheckFrame| {
    let table: RuleTable = frame.rules.into_iter().map(|(n, r)| (n, to_rule(r))).collect();
    let depth = match frame.max_hops {
        None => AliasDepth::Single,
        Some(hops) => AliasDepth::Fixpoint { max_hops: hops as usize },
    };
    let evaluator = Evaluator::new(
        AclConfig::new(frame.held).with_global_rules(table.clone()).with_alias_depth(depth),
    );

    for next in std::iter::once(Vec::new()).chain(frame.changes) {
        evaluator.change(next);
        for q in &frame.queries {
            let allowed = evaluator.check(q);
            assert!(table.contains(q) || !allowed);
        }
    }
});
