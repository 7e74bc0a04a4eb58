#![no_main]

// Harness: navigate
// The committed path is always either the requested path or the notfound path,
// and the notfound path itself always passes.

use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use acl_core::navigation::{NavigationDecision, RouteMeta, StaticRouter};
use acl_core::{register, AclConfig, Rule};

#[derive(Arbitrary, Debug, Clone)]
struct NavFrame {
    held: Vec<String>,
    routes: Vec<(String, Option<Vec<String>>)>,
    targets: Vec<String>,
}

fuzz_target!(|frame: NavFrame| {
    let mut router = StaticRouter::new().with_route("/404", RouteMeta::unguarded());
    for (path, rule) in frame.routes {
        let meta = RouteMeta { rule: rule.map(Rule::AnyOf) };
        router.add_route(path, meta);
    }
    let config = AclConfig::new(frame.held).with_notfound("/404");
    if register(config, Some(&mut router)).is_err() {
        return;
    }

    for target in frame.targets.iter().chain(std::iter::once(&"/404".to_string())) {
        if let Ok(nav) = router.navigate(target) {
            assert!(nav.committed == *target || nav.committed == "/404");
            if target == "/404" {
                assert_eq!(nav.decision, Some(NavigationDecision::PassThrough));
            }
        }
    }
});
