//! # Trino ACL
//!
//! Access-control decision engine for Trino file-based access control rules.
//!
//! ## Features
//!
//! - **Ordered rule lists** per rule kind; list position is precedence
//! - **First-match-wins** evaluation for catalog, schema and table scopes
//! - **Regex-or-literal patterns** compiled once per rule at load time
//! - **Atomic reload**: evaluations always see one whole rule set
//! - **Default deny**: no matching rule is an ordinary decision, not an error
//!
//! ## Example
//!
//! ```rust
//! use trino_acl::{AccessEngine, AccessRequest, CatalogAccess, Principal, RuleSet};
//!
//! let rules = RuleSet::from_json_str(r#"{
//!     "catalogs": [{ "catalog": "hive", "allow": "read-only" }],
//!     "tables": [{
//!         "group": "analyst",
//!         "catalog": "hive",
//!         "schema": "sales",
//!         "table": "orders",
//!         "privileges": ["SELECT", "CREATE_VIEW"]
//!     }]
//! }"#)?;
//!
//! let engine = AccessEngine::with_rules(rules);
//! let request = AccessRequest::new(Principal::new("bob").with_group("analyst"), "hive")
//!     .with_schema("sales")
//!     .with_table("orders");
//!
//! let access = engine.check(&request);
//! assert!(access.visible);
//! assert_eq!(access.catalog.allow, CatalogAccess::ReadOnly);
//! # Ok::<(), trino_acl::AclError>(())
//! ```

pub mod engine;
pub mod error;
pub mod identity;
pub mod pattern;
pub mod rules;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use engine::{
    compute_effective_access, evaluate_catalog, evaluate_schema, evaluate_table, AccessEngine,
    AccessRequest, CatalogDecision, EffectiveAccess, EngineConfig, SchemaDecision, TableDecision,
};
pub use error::{AclError, Result};
pub use identity::{IdentityFilter, IdentityMatcher};
pub use pattern::Pattern;
pub use rules::{
    CatalogRule, CompiledRuleSet, IdentityRule, RuleKind, RuleSet, SchemaRule, TableRule,
};
pub use store::{FileRuleSource, RuleSource, RuleStore, StaticRuleSource};
pub use types::{CatalogAccess, Principal, Privilege, PrivilegeSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
