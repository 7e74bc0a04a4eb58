#![no_main]

// Harness: config_parse
// Arbitrary bytes as JSON options. Parsing either fails with InvalidConfig or
// yields a config an evaluator can be built from.

use libfuzzer_sys::fuzz_target;
use acl_core::{AclConfig, AclError, Evaluator};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else { return };
    match AclConfig::from_json_str(text) {
        Ok(config) => {
            let names: Vec<String> = config.global_rules.names().map(str::to_string).collect();
            let evaluator = Evaluator::new(config);
            for name in names {
                let _ = evaluator.check(&name);
            }
        }
        Err(err) => assert!(matches!(err, AclError::InvalidConfig(_))),
    }
});
