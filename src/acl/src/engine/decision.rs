//! Access request and decision types

use crate::rules::{CatalogRule, SchemaRule, TableRule};
use crate::types::{CatalogAccess, Principal, PrivilegeSet};
use serde::{Deserialize, Serialize};

/// Effective-access request for one resource coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Principal making the request
    pub principal: Principal,

    /// Catalog name
    pub catalog: String,

    /// Schema name, if the request goes below catalog level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Table name; ignored unless a schema is also given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl AccessRequest {
    /// Create a catalog-level request
    pub fn new(principal: Principal, catalog: impl Into<String>) -> Self {
        Self {
            principal,
            catalog: catalog.into(),
            schema: None,
            table: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

/// Rule that decided a scope, with its position in the rule list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedRule<R> {
    pub index: usize,
    pub rule: R,
}

/// Catalog-scope decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDecision {
    pub matched_rule: Option<MatchedRule<CatalogRule>>,
    pub allow: CatalogAccess,
    pub allowed_privileges: PrivilegeSet,
}

impl CatalogDecision {
    /// Decision when no catalog rule matches
    pub fn deny() -> Self {
        Self {
            matched_rule: None,
            allow: CatalogAccess::None,
            allowed_privileges: PrivilegeSet::new(),
        }
    }
}

/// Schema-scope decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDecision {
    pub matched_rule: Option<MatchedRule<SchemaRule>>,
    pub owner: bool,
}

impl SchemaDecision {
    /// Decision when no schema rule matches
    pub fn deny() -> Self {
        Self {
            matched_rule: None,
            owner: false,
        }
    }
}

/// Table-scope decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDecision {
    pub matched_rule: Option<MatchedRule<TableRule>>,
    pub privileges: PrivilegeSet,
}

impl TableDecision {
    /// Decision when no table rule matches
    pub fn deny() -> Self {
        Self {
            matched_rule: None,
            privileges: PrivilegeSet::new(),
        }
    }
}

/// Layered decision across catalog, schema and table scopes
///
/// `schema` is present when the request named a schema; `table` only when it
/// named both a schema and a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveAccess {
    pub catalog: CatalogDecision,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDecision>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableDecision>,

    /// Whether the catalog is visible to the principal
    pub visible: bool,
}

impl EffectiveAccess {
    /// Table privileges, empty when no table decision was made
    pub fn table_privileges(&self) -> PrivilegeSet {
        self.table
            .as_ref()
            .map(|table| table.privileges.clone())
            .unwrap_or_default()
    }

    /// Schema ownership, false when no schema decision was made
    pub fn is_schema_owner(&self) -> bool {
        self.schema.as_ref().is_some_and(|schema| schema.owner)
    }
}
