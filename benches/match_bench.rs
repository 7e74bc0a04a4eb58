use criterion::{criterion_group, criterion_main, Criterion};
use acl_core::{AclConfig, Evaluator, Rule};

fn check_benchmarks(c: &mut Criterion) {
    let held: Vec<String> = (0..64).map(|i| format!("perm_{i}")).collect();
    let evaluator = Evaluator::new(
        AclConfig::new(held)
            .with_global_rule("literal", "perm_63")
            .with_global_rule("list", Rule::any_of(["x", "y", "perm_32"]))
            .with_global_rule("alias", Rule::alias("list")),
    );

    c.bench_function("check_literal", |b| b.iter(|| evaluator.check("literal")));
    c.bench_function("check_any_of", |b| b.iter(|| evaluator.check("list")));
    c.bench_function("check_alias", |b| b.iter(|| evaluator.check("alias")));
    c.bench_function("check_unknown", |b| b.iter(|| evaluator.check("missing")));
}

criterion_group!(benches, check_benchmarks);
criterion_main!(benches);
