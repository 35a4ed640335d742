//! Scope evaluators
//!
//! Each evaluator scans one rule list in order and returns the effect of the
//! first rule whose identity filter and resource patterns all match. List
//! order is the only precedence signal; no rule is preferred for being more
//! specific. When nothing matches, the scope's deny decision is returned.

use super::decision::{CatalogDecision, MatchedRule, SchemaDecision, TableDecision};
use crate::rules::CompiledRuleSet;
use crate::types::Principal;
use tracing::debug;

/// Evaluate catalog visibility
pub fn evaluate_catalog(rules: &CompiledRuleSet, principal: &Principal, catalog: &str) -> CatalogDecision {
    let matched = rules
        .catalogs()
        .iter()
        .find(|rule| rule.identity.matches(principal) && rule.catalog.matches(catalog));

    match matched {
        Some(rule) => {
            debug!(
                "Catalog rule {} matched: user={}, catalog={}, allow={}",
                rule.index, principal.user, catalog, rule.rule.allow
            );
            CatalogDecision {
                matched_rule: Some(MatchedRule {
                    index: rule.index,
                    rule: rule.rule.clone(),
                }),
                allow: rule.rule.allow,
                allowed_privileges: rule.rule.allow.privileges(),
            }
        }
        None => {
            debug!("No catalog rule matched: user={}, catalog={}", principal.user, catalog);
            CatalogDecision::deny()
        }
    }
}

/// Evaluate schema ownership
pub fn evaluate_schema(
    rules: &CompiledRuleSet,
    principal: &Principal,
    catalog: &str,
    schema: &str,
) -> SchemaDecision {
    let matched = rules.schemas().iter().find(|rule| {
        rule.identity.matches(principal) && rule.catalog.matches(catalog) && rule.schema.matches(schema)
    });

    match matched {
        Some(rule) => {
            debug!(
                "Schema rule {} matched: user={}, schema={}.{}, owner={}",
                rule.index, principal.user, catalog, schema, rule.rule.owner
            );
            SchemaDecision {
                matched_rule: Some(MatchedRule {
                    index: rule.index,
                    rule: rule.rule.clone(),
                }),
                owner: rule.rule.owner,
            }
        }
        None => {
            debug!("No schema rule matched: user={}, schema={}.{}", principal.user, catalog, schema);
            SchemaDecision::deny()
        }
    }
}

/// Evaluate table privileges
///
/// Privilege tokens outside the known privilege set are dropped.
pub fn evaluate_table(
    rules: &CompiledRuleSet,
    principal: &Principal,
    catalog: &str,
    schema: &str,
    table: &str,
) -> TableDecision {
    let matched = rules.tables().iter().find(|rule| {
        rule.identity.matches(principal)
            && rule.catalog.matches(catalog)
            && rule.schema.matches(schema)
            && rule.table.matches(table)
    });

    match matched {
        Some(rule) => {
            debug!(
                "Table rule {} matched: user={}, table={}.{}.{}, privileges={:?}",
                rule.index, principal.user, catalog, schema, table, rule.privileges
            );
            TableDecision {
                matched_rule: Some(MatchedRule {
                    index: rule.index,
                    rule: rule.rule.clone(),
                }),
                privileges: rule.privileges.clone(),
            }
        }
        None => {
            debug!(
                "No table rule matched: user={}, table={}.{}.{}",
                principal.user, catalog, schema, table
            );
            TableDecision::deny()
        }
    }
}
