//! Active rule set storage and reload
//!
//! The active rule set is published as an `Arc` snapshot. A reload builds and
//! compiles the replacement completely before swapping the pointer, so an
//! evaluation holding a snapshot always sees one whole rule set. A failed load
//! leaves the active snapshot untouched.

use crate::error::Result;
use crate::rules::{CompiledRuleSet, RuleKind, RuleSet};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Source of rule documents
#[async_trait]
pub trait RuleSource: Send + Sync {
    /// Fetch and parse the current rule set
    async fn fetch(&self) -> Result<RuleSet>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Rule document stored in a JSON file
#[derive(Debug, Clone)]
pub struct FileRuleSource {
    path: PathBuf,
}

impl FileRuleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a rule set to the file, optionally wrapped in the `data` envelope
    pub async fn save(&self, rules: &RuleSet, wrap: bool) -> Result<()> {
        let json = rules.to_json_pretty(wrap)?;
        tokio::fs::write(&self.path, json).await?;
        info!("Saved rules to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl RuleSource for FileRuleSource {
    async fn fetch(&self) -> Result<RuleSet> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        RuleSet::from_json_str(&json)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Rule set held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticRuleSource {
    rules: RuleSet,
}

impl StaticRuleSource {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl RuleSource for StaticRuleSource {
    async fn fetch(&self) -> Result<RuleSet> {
        Ok(self.rules.clone())
    }

    fn describe(&self) -> String {
        "in-memory rules".to_string()
    }
}

/// One published version of the rule set
#[derive(Debug)]
pub struct RuleSnapshot {
    /// Compiled rules
    pub rules: CompiledRuleSet,

    /// Increases by one on every successful replace, starting at 0
    pub generation: u64,

    /// When this version was published
    pub loaded_at: DateTime<Utc>,
}

/// Holder of the active rule set
#[derive(Debug)]
pub struct RuleStore {
    current: RwLock<Arc<RuleSnapshot>>,
}

impl RuleStore {
    /// Create a store whose initial rule set is `rules`
    pub fn new(rules: RuleSet) -> Self {
        let snapshot = RuleSnapshot {
            rules: CompiledRuleSet::compile(rules),
            generation: 0,
            loaded_at: Utc::now(),
        };

        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Create a store with no rules (deny everything)
    pub fn empty() -> Self {
        Self::new(RuleSet::empty())
    }

    /// Current snapshot; stays valid across later reloads
    pub fn snapshot(&self) -> Arc<RuleSnapshot> {
        self.current.read().clone()
    }

    /// Generation of the active rule set
    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }

    /// Publish a new rule set, returning its generation
    pub fn replace(&self, rules: RuleSet) -> u64 {
        let counts: Vec<String> = RuleKind::ALL
            .iter()
            .filter(|kind| rules.len_of(**kind) > 0)
            .map(|kind| format!("{}={}", kind, rules.len_of(*kind)))
            .collect();
        let compiled = CompiledRuleSet::compile(rules);

        let mut current = self.current.write();
        let generation = current.generation + 1;
        *current = Arc::new(RuleSnapshot {
            rules: compiled,
            generation,
            loaded_at: Utc::now(),
        });
        drop(current);

        info!("Published rule set generation {} ({})", generation, counts.join(", "));
        generation
    }

    /// Parse a document and publish it
    ///
    /// # Errors
    ///
    /// Returns the load error; the active rule set is kept.
    pub fn load_document(&self, document: Value) -> Result<u64> {
        match RuleSet::from_document(document) {
            Ok(rules) => Ok(self.replace(rules)),
            Err(e) => {
                warn!("Rejected rule document, keeping generation {}: {}", self.generation(), e);
                Err(e)
            }
        }
    }

    /// Parse JSON text and publish it
    pub fn load_str(&self, json: &str) -> Result<u64> {
        match RuleSet::from_json_str(json) {
            Ok(rules) => Ok(self.replace(rules)),
            Err(e) => {
                warn!("Rejected rule document, keeping generation {}: {}", self.generation(), e);
                Err(e)
            }
        }
    }

    /// Fetch from a source and publish the result
    pub async fn reload(&self, source: &dyn RuleSource) -> Result<u64> {
        match source.fetch().await {
            Ok(rules) => {
                info!("Loaded rules from {}", source.describe());
                Ok(self.replace(rules))
            }
            Err(e) => {
                warn!(
                    "Failed to load rules from {}, keeping generation {}: {}",
                    source.describe(),
                    self.generation(),
                    e
                );
                Err(e)
            }
        }
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AclError;
    use crate::rules::CatalogRule;
    use crate::types::CatalogAccess;
    use serde_json::json;

    fn one_catalog(allow: CatalogAccess) -> RuleSet {
        let mut rules = RuleSet::empty();
        rules.push_catalog(CatalogRule::new("hive", allow));
        rules
    }

    #[test]
    fn test_new_store_is_generation_zero() {
        let store = RuleStore::empty();
        assert_eq!(store.generation(), 0);
        assert!(store.snapshot().rules.source().is_empty());
    }

    #[test]
    fn test_replace_bumps_generation() {
        let store = RuleStore::empty();
        assert_eq!(store.replace(one_catalog(CatalogAccess::All)), 1);
        assert_eq!(store.replace(one_catalog(CatalogAccess::None)), 2);
        assert_eq!(store.snapshot().rules.catalogs()[0].rule.allow, CatalogAccess::None);
    }

    #[test]
    fn test_old_snapshot_survives_replace() {
        let store = RuleStore::new(one_catalog(CatalogAccess::ReadOnly));
        let before = store.snapshot();

        store.replace(RuleSet::empty());

        assert_eq!(before.rules.catalogs().len(), 1);
        assert_eq!(before.generation, 0);
        assert!(store.snapshot().rules.catalogs().is_empty());
    }

    #[test]
    fn test_failed_load_keeps_active_rules() {
        let store = RuleStore::new(one_catalog(CatalogAccess::ReadOnly));

        let err = store
            .load_document(json!({ "catalogs": [{ "allow": "all" }] }))
            .unwrap_err();
        assert!(matches!(err, AclError::Json(_)));

        let err = store.load_str("not json").unwrap_err();
        assert!(matches!(err, AclError::Json(_)));

        assert_eq!(store.generation(), 0);
        assert_eq!(store.snapshot().rules.catalogs()[0].rule.allow, CatalogAccess::ReadOnly);
    }

    #[test]
    fn test_load_wrapped_document() {
        let store = RuleStore::empty();
        let generation = store
            .load_document(json!({ "data": { "catalogs": [{ "catalog": ".*", "allow": "all" }] } }))
            .unwrap();

        assert_eq!(generation, 1);
        assert_eq!(store.snapshot().rules.catalogs().len(), 1);
    }

    #[tokio::test]
    async fn test_reload_from_static_source() {
        let store = RuleStore::empty();
        let source = StaticRuleSource::new(one_catalog(CatalogAccess::All));

        assert_eq!(store.reload(&source).await.unwrap(), 1);
        assert_eq!(store.snapshot().rules.source(), &one_catalog(CatalogAccess::All));
    }

    #[tokio::test]
    async fn test_reload_from_missing_file_fails() {
        let store = RuleStore::new(one_catalog(CatalogAccess::All));
        let source = FileRuleSource::new("/nonexistent/rules.json");

        let err = store.reload(&source).await.unwrap_err();
        assert!(matches!(err, AclError::Io(_)));
        assert_eq!(store.generation(), 0);
    }
}
