//! Effective-access decision tests
//!
//! Covers the documented scenarios plus first-match, default-deny and
//! determinism properties over generated rule sets.

use proptest::prelude::*;
use std::sync::Arc;
use trino_acl::{
    compute_effective_access, evaluate_catalog, AccessEngine, AccessRequest, CatalogAccess,
    CatalogRule, CompiledRuleSet, EngineConfig, IdentityRule, Principal, Privilege, PrivilegeSet,
    RuleSet, RuleStore, SchemaRule, TableRule,
};

// ============================================================================
// SCENARIOS
// ============================================================================

fn scenario_a_rules() -> RuleSet {
    RuleSet::from_json_str(
        r#"{
            "catalogs": [{ "catalog": "hive", "allow": "read-only" }],
            "tables": [{
                "group": "analyst",
                "catalog": "hive",
                "schema": "sales",
                "table": "orders",
                "privileges": ["SELECT", "CREATE_VIEW"]
            }]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_scenario_a_read_only_catalog_with_table_grant() {
    let engine = AccessEngine::with_rules(scenario_a_rules());
    let bob = Principal::new("bob").with_group("analyst");

    let access = engine.check(
        &AccessRequest::new(bob, "hive")
            .with_schema("sales")
            .with_table("orders"),
    );

    assert_eq!(access.catalog.allow, CatalogAccess::ReadOnly);
    assert_eq!(
        access.catalog.allowed_privileges,
        PrivilegeSet::from([Privilege::Select, Privilege::CreateView])
    );
    assert_eq!(
        access.table_privileges(),
        PrivilegeSet::from([Privilege::Select, Privilege::CreateView])
    );
    assert!(access.visible);

    let matched = access.table.unwrap().matched_rule.unwrap();
    assert_eq!(matched.index, 0);
    assert_eq!(matched.rule.identity.group.as_deref(), Some("analyst"));
}

#[test]
fn test_scenario_b_empty_rules_deny_everything() {
    let engine = AccessEngine::with_rules(RuleSet::empty());

    let access = engine.check(
        &AccessRequest::new(Principal::new("bob"), "hive")
            .with_schema("sales")
            .with_table("orders"),
    );

    assert_eq!(access.catalog.allow, CatalogAccess::None);
    assert!(access.catalog.matched_rule.is_none());
    assert!(!access.visible);
    assert!(!access.is_schema_owner());
    assert!(access.table_privileges().is_empty());
    assert!(access.table.unwrap().matched_rule.is_none());
}

#[test]
fn test_scenario_c_unrestricted_wildcard_catalog() {
    let mut rules = RuleSet::empty();
    rules.push_catalog(CatalogRule::new(".*", CatalogAccess::All));
    let rules = CompiledRuleSet::compile(rules);

    for user in ["alice", "bob", "", "svc-etl"] {
        for catalog in ["hive", "iceberg", "system", ""] {
            let decision = evaluate_catalog(&rules, &Principal::new(user), catalog);
            assert_eq!(decision.allow, CatalogAccess::All, "user={user}, catalog={catalog}");
        }
    }
}

// ============================================================================
// IDENTITY AND PATTERN SEMANTICS
// ============================================================================

#[test]
fn test_identity_fields_are_ored() {
    let mut rules = RuleSet::empty();
    rules.push_catalog(
        CatalogRule::new("hive", CatalogAccess::All)
            .with_user("alice")
            .with_group("finance"),
    );
    let rules = CompiledRuleSet::compile(rules);

    let bob = Principal::new("bob").with_group("finance");
    assert_eq!(evaluate_catalog(&rules, &bob, "hive").allow, CatalogAccess::All);

    let carol = Principal::new("carol").with_group("sales");
    assert_eq!(evaluate_catalog(&rules, &carol, "hive").allow, CatalogAccess::None);
}

#[test]
fn test_role_only_rule() {
    let mut rules = RuleSet::empty();
    rules
        .push_schema(SchemaRule::new("hive", ".*", true).with_role("data_owner"))
        .push_schema(SchemaRule::new("hive", ".*", false));
    let rules = CompiledRuleSet::compile(rules);

    let owner = Principal::new("dave").with_role("data_owner");
    let access = compute_effective_access(&rules, &owner, "hive", Some("finance"), None);
    assert!(access.is_schema_owner());

    let reader = Principal::new("dave").with_role("reader");
    let access = compute_effective_access(&rules, &reader, "hive", Some("finance"), None);
    assert!(!access.is_schema_owner());
    assert_eq!(access.schema.unwrap().matched_rule.unwrap().index, 1);
}

#[test]
fn test_malformed_catalog_pattern_matches_literally() {
    let mut rules = RuleSet::empty();
    rules.push_catalog(CatalogRule::new("[", CatalogAccess::ReadOnly));
    let rules = CompiledRuleSet::compile(rules);

    let bob = Principal::new("bob");
    assert_eq!(evaluate_catalog(&rules, &bob, "[").allow, CatalogAccess::ReadOnly);
    assert_eq!(evaluate_catalog(&rules, &bob, "x").allow, CatalogAccess::None);
}

#[test]
fn test_patterns_are_anchored() {
    let mut rules = RuleSet::empty();
    rules.push_table(TableRule::new("hive", "sales", "order", [Privilege::Select]));
    let rules = CompiledRuleSet::compile(rules);

    let bob = Principal::new("bob");
    let access = compute_effective_access(&rules, &bob, "hive", Some("sales"), Some("orders"));
    assert!(access.table_privileges().is_empty());
}

#[test]
fn test_unknown_privileges_are_dropped() {
    let rules = RuleSet::from_json_str(
        r#"{
            "catalogs": [{ "catalog": ".*", "allow": "all" }],
            "tables": [{
                "catalog": "hive",
                "schema": ".*",
                "table": ".*",
                "privileges": ["SELECT", "TRUNCATE", "select", "INSERT"]
            }]
        }"#,
    )
    .unwrap();
    let engine = AccessEngine::with_rules(rules);

    let access = engine.evaluate(&Principal::new("bob"), "hive", Some("sales"), Some("orders"));
    assert_eq!(
        access.table_privileges(),
        PrivilegeSet::from([Privilege::Select, Privilege::Insert])
    );
}

// ============================================================================
// COMPOSER SHAPE
// ============================================================================

#[test]
fn test_partial_coordinates() {
    let engine = AccessEngine::with_rules(scenario_a_rules());
    let bob = Principal::new("bob").with_group("analyst");

    let catalog_only = engine.evaluate(&bob, "hive", None, None);
    assert!(catalog_only.schema.is_none());
    assert!(catalog_only.table.is_none());

    let schema_only = engine.evaluate(&bob, "hive", Some("sales"), None);
    assert!(schema_only.schema.is_some());
    assert!(schema_only.table.is_none());

    let table_without_schema = engine.evaluate(&bob, "hive", None, Some("orders"));
    assert!(table_without_schema.schema.is_none());
    assert!(table_without_schema.table.is_none());
}

#[test]
fn test_effective_access_json_keys() {
    let engine = AccessEngine::with_rules(scenario_a_rules());
    let bob = Principal::new("bob").with_group("analyst");

    let value = serde_json::to_value(engine.evaluate(&bob, "hive", Some("sales"), Some("orders"))).unwrap();
    let object = value.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["catalog", "schema", "table", "visible"]);
    assert_eq!(value["schema"]["matched_rule"], serde_json::Value::Null);
    assert_eq!(value["schema"]["owner"], serde_json::json!(false));
}

#[test]
fn test_engine_shares_store_across_threads() {
    let store = Arc::new(RuleStore::new(scenario_a_rules()));
    let engine = Arc::new(AccessEngine::new(EngineConfig::default(), store));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let principal = Principal::new(format!("user-{i}")).with_group("analyst");
                engine
                    .evaluate(&principal, "hive", Some("sales"), Some("orders"))
                    .table_privileges()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            PrivilegeSet::from([Privilege::Select, Privilege::CreateView])
        );
    }
    assert_eq!(engine.get_metrics().unwrap().total_evaluations, 8);
}

// ============================================================================
// PROPERTIES
// ============================================================================

fn pattern_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(".*".to_string()),
        Just("hive".to_string()),
        Just("iceberg".to_string()),
        Just("hive|iceberg".to_string()),
        Just("[".to_string()),
        "[a-z]{1,6}",
    ]
}

fn access_strategy() -> impl Strategy<Value = CatalogAccess> {
    prop_oneof![
        Just(CatalogAccess::All),
        Just(CatalogAccess::ReadOnly),
        Just(CatalogAccess::None),
    ]
}

fn catalog_rule_strategy() -> impl Strategy<Value = CatalogRule> {
    (
        pattern_strategy(),
        access_strategy(),
        proptest::option::of("alice|bob|[a-z]{1,4}"),
        proptest::option::of("analyst|finance"),
    )
        .prop_map(|(catalog, allow, user, group)| {
            let mut rule = CatalogRule::new(catalog, allow);
            rule.identity.user = user;
            rule.identity.group = group;
            rule
        })
}

fn principal_strategy() -> impl Strategy<Value = Principal> {
    (
        "alice|bob|carol",
        proptest::collection::btree_set("analyst|finance|sales", 0..3),
    )
        .prop_map(|(user, groups)| Principal::new(user).with_groups(groups))
}

proptest! {
    #[test]
    fn prop_catalog_decision_is_deterministic(
        rules in proptest::collection::vec(catalog_rule_strategy(), 0..8),
        principal in principal_strategy(),
        catalog in "hive|iceberg|delta|\\[",
    ) {
        let mut rule_set = RuleSet::empty();
        rule_set.catalogs = rules;
        let compiled = CompiledRuleSet::compile(rule_set);

        let first = evaluate_catalog(&compiled, &principal, &catalog);
        let second = evaluate_catalog(&compiled, &principal, &catalog);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.allowed_privileges, first.allow.privileges());
    }

    #[test]
    fn prop_first_matching_rule_wins(
        first_access in access_strategy(),
        rest in proptest::collection::vec(catalog_rule_strategy(), 0..8),
        principal in principal_strategy(),
        catalog in "hive|iceberg|delta",
    ) {
        let mut rule_set = RuleSet::empty();
        rule_set.push_catalog(CatalogRule::new(".*", first_access));
        rule_set.catalogs.extend(rest);
        let compiled = CompiledRuleSet::compile(rule_set);

        let decision = evaluate_catalog(&compiled, &principal, &catalog);
        prop_assert_eq!(decision.allow, first_access);
        prop_assert_eq!(decision.matched_rule.map(|m| m.index), Some(0));
    }

    #[test]
    fn prop_empty_rules_deny(
        principal in principal_strategy(),
        catalog in "[a-z]{0,8}",
        schema in proptest::option::of("[a-z]{0,8}"),
        table in proptest::option::of("[a-z]{0,8}"),
    ) {
        let compiled = CompiledRuleSet::compile(RuleSet::empty());
        let access = compute_effective_access(
            &compiled,
            &principal,
            &catalog,
            schema.as_deref(),
            table.as_deref(),
        );

        prop_assert!(!access.visible);
        prop_assert!(!access.is_schema_owner());
        prop_assert!(access.table_privileges().is_empty());
    }
}
