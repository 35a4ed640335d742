//! Effective-access engine
//!
//! Composes the catalog, schema and table evaluators into one layered
//! decision, and wraps them with the shared rule store and metrics.
//!
//! ```text
//! RuleStore ──snapshot──▶ evaluate_catalog ──▶ visible
//!                  │      evaluate_schema  (schema given)
//!                  │      evaluate_table   (schema and table given)
//!                  └────────────────────────▶ EffectiveAccess ──▶ caller
//! ```

pub mod decision;
pub mod evaluator;
pub mod metrics;

pub use decision::{
    AccessRequest, CatalogDecision, EffectiveAccess, MatchedRule, SchemaDecision, TableDecision,
};
pub use evaluator::{evaluate_catalog, evaluate_schema, evaluate_table};
pub use metrics::{EngineMetrics, MetricsCollector};

use crate::error::Result;
use crate::rules::{CompiledRuleSet, RuleSet};
use crate::store::{RuleSource, RuleStore};
use crate::types::Principal;
use std::sync::Arc;
use tracing::debug;

/// Compute the layered decision for one resource coordinate
///
/// The catalog scope is always evaluated. The schema scope is evaluated when
/// `schema` is non-empty, and the table scope only when both `schema` and
/// `table` are non-empty; there is no implicit default schema.
pub fn compute_effective_access(
    rules: &CompiledRuleSet,
    principal: &Principal,
    catalog: &str,
    schema: Option<&str>,
    table: Option<&str>,
) -> EffectiveAccess {
    let schema = schema.filter(|s| !s.is_empty());
    let table = table.filter(|t| !t.is_empty());

    let catalog_decision = evaluate_catalog(rules, principal, catalog);
    let visible = catalog_decision.allow.is_visible();

    let schema_decision = schema.map(|schema| evaluate_schema(rules, principal, catalog, schema));

    let table_decision = match (schema, table) {
        (Some(schema), Some(table)) => Some(evaluate_table(rules, principal, catalog, schema, table)),
        _ => None,
    };

    EffectiveAccess {
        catalog: catalog_decision,
        schema: schema_decision,
        table: table_decision,
        visible,
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Enable decision and reload counters
    pub enable_metrics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { enable_metrics: true }
    }
}

/// Access engine bound to a shared rule store
///
/// The engine holds no per-request state; every check reads the store's
/// current snapshot.
pub struct AccessEngine {
    store: Arc<RuleStore>,
    metrics: Option<Arc<MetricsCollector>>,
    config: EngineConfig,
}

impl AccessEngine {
    /// Create an engine over an existing store
    pub fn new(config: EngineConfig, store: Arc<RuleStore>) -> Self {
        let metrics = config
            .enable_metrics
            .then(|| Arc::new(MetricsCollector::new()));

        Self { store, metrics, config }
    }

    /// Create an engine with its own store holding `rules`
    pub fn with_rules(rules: RuleSet) -> Self {
        Self::new(EngineConfig::default(), Arc::new(RuleStore::new(rules)))
    }

    /// Evaluate an access request against the active rule set
    pub fn check(&self, request: &AccessRequest) -> EffectiveAccess {
        self.evaluate(
            &request.principal,
            &request.catalog,
            request.schema.as_deref(),
            request.table.as_deref(),
        )
    }

    /// Evaluate a resource coordinate against the active rule set
    pub fn evaluate(
        &self,
        principal: &Principal,
        catalog: &str,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> EffectiveAccess {
        let snapshot = self.store.snapshot();

        debug!(
            "Evaluating access: user={}, catalog={}, schema={:?}, table={:?}, generation={}",
            principal.user, catalog, schema, table, snapshot.generation
        );

        let access = compute_effective_access(&snapshot.rules, principal, catalog, schema, table);

        if let Some(metrics) = &self.metrics {
            metrics.record_evaluation(access.visible);
        }

        access
    }

    /// Reload the rule set from a source
    ///
    /// On failure the previous rule set stays active.
    pub async fn reload(&self, source: &dyn RuleSource) -> Result<u64> {
        let result = self.store.reload(source).await;

        if let Some(metrics) = &self.metrics {
            metrics.record_reload(result.is_ok());
        }

        result
    }

    /// Shared rule store
    pub fn store(&self) -> &Arc<RuleStore> {
        &self.store
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Counters, when metrics are enabled
    pub fn get_metrics(&self) -> Option<EngineMetrics> {
        self.metrics.as_ref().map(|metrics| metrics.get_metrics())
    }
}
