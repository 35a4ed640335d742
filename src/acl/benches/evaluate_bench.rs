//! Benchmarks for effective-access evaluation
//!
//! Measures performance of:
//! - Pattern matching (regex vs literal fallback)
//! - Catalog evaluation over growing rule lists
//! - Full catalog/schema/table composition
//! - Rule set compilation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trino_acl::{
    compute_effective_access, evaluate_catalog, CatalogAccess, CatalogRule, CompiledRuleSet,
    IdentityRule, Pattern, Principal, Privilege, RuleSet, SchemaRule, TableRule,
};

/// Rule set whose matching rules sit at the end of every list
fn rules_with_len(len: usize) -> RuleSet {
    let mut rules = RuleSet::empty();

    for i in 0..len {
        rules
            .push_catalog(CatalogRule::new(format!("catalog_{i}"), CatalogAccess::ReadOnly).with_user(format!("user_{i}")))
            .push_schema(SchemaRule::new("hive", format!("schema_{i}"), false).with_group(format!("group_{i}")))
            .push_table(
                TableRule::new("hive", "sales", format!("table_{i}"), [Privilege::Select])
                    .with_role(format!("role_{i}")),
            );
    }

    rules
        .push_catalog(CatalogRule::new("hive|iceberg", CatalogAccess::All).with_group("analyst"))
        .push_schema(SchemaRule::new("hive", "sales", true).with_group("analyst"))
        .push_table(
            TableRule::new("hive", "sales", "orders|returns", Privilege::ALL).with_group("analyst"),
        );

    rules
}

fn analyst() -> Principal {
    Principal::new("bob")
        .with_groups(["analyst", "reporting", "finance"])
        .with_role("reader")
}

fn bench_pattern_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_matching");

    let regex = Pattern::compile("sales_[0-9]+|orders");
    let literal = Pattern::compile("sales[");

    group.bench_function("regex", |b| {
        b.iter(|| regex.matches(black_box("sales_2024")));
    });

    group.bench_function("literal_fallback", |b| {
        b.iter(|| literal.matches(black_box("sales[")));
    });

    group.finish();
}

fn bench_catalog_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_evaluation");
    let principal = analyst();

    for len in [10, 100, 1_000] {
        let rules = CompiledRuleSet::compile(rules_with_len(len));
        group.bench_with_input(BenchmarkId::from_parameter(len), &rules, |b, rules| {
            b.iter(|| evaluate_catalog(rules, &principal, black_box("hive")));
        });
    }

    group.finish();
}

fn bench_effective_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("effective_access");
    let principal = analyst();

    for len in [10, 100, 1_000] {
        let rules = CompiledRuleSet::compile(rules_with_len(len));
        group.bench_with_input(BenchmarkId::from_parameter(len), &rules, |b, rules| {
            b.iter(|| {
                compute_effective_access(
                    rules,
                    &principal,
                    black_box("hive"),
                    Some(black_box("sales")),
                    Some(black_box("orders")),
                )
            });
        });
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for len in [10, 100, 1_000] {
        let rules = rules_with_len(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &rules, |b, rules| {
            b.iter(|| CompiledRuleSet::compile(black_box(rules.clone())));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_pattern_matching,
    bench_catalog_evaluation,
    bench_effective_access,
    bench_compile
);
criterion_main!(benches);
