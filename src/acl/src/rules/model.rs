//! Rule definitions, one struct per rule kind
//!
//! Field names follow the rule document format. Identity fields are flattened
//! into each rule so a document entry reads
//! `{"group": "analyst", "catalog": "hive", "allow": "read-only"}`.

use crate::identity::IdentityFilter;
use crate::types::{CatalogAccess, Privilege, PrivilegeSet};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Access to pattern fields shared by every rule kind
pub trait Rule {
    /// Every pattern field that is set, with its document field name
    fn patterns(&self) -> Vec<(&'static str, &str)>;
}

/// Builder helpers for rule kinds that carry an identity filter
pub trait IdentityRule: Sized {
    /// Identity filter of the rule
    fn identity(&self) -> &IdentityFilter;

    /// Mutable identity filter of the rule
    fn identity_mut(&mut self) -> &mut IdentityFilter;

    /// Restrict the rule to users matching `pattern`
    fn with_user(mut self, pattern: impl Into<String>) -> Self {
        self.identity_mut().user = Some(pattern.into());
        self
    }

    /// Restrict the rule to principals with a group matching `pattern`
    fn with_group(mut self, pattern: impl Into<String>) -> Self {
        self.identity_mut().group = Some(pattern.into());
        self
    }

    /// Restrict the rule to principals with a role matching `pattern`
    fn with_role(mut self, pattern: impl Into<String>) -> Self {
        self.identity_mut().role = Some(pattern.into());
        self
    }
}

/// Catalog visibility rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRule {
    #[serde(flatten)]
    pub identity: IdentityFilter,

    /// Catalog name pattern
    pub catalog: String,

    /// Access granted on matching catalogs
    #[serde(default)]
    pub allow: CatalogAccess,
}

impl CatalogRule {
    pub fn new(catalog: impl Into<String>, allow: CatalogAccess) -> Self {
        Self {
            identity: IdentityFilter::any(),
            catalog: catalog.into(),
            allow,
        }
    }

    /// Starting point for a newly added catalog rule: every catalog, read-only
    pub fn template() -> Self {
        Self::new(".*", CatalogAccess::ReadOnly)
    }
}

/// Schema ownership rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRule {
    #[serde(flatten)]
    pub identity: IdentityFilter,

    pub catalog: String,

    pub schema: String,

    /// Whether matching principals own the schema
    #[serde(default)]
    pub owner: bool,
}

impl SchemaRule {
    pub fn new(catalog: impl Into<String>, schema: impl Into<String>, owner: bool) -> Self {
        Self {
            identity: IdentityFilter::any(),
            catalog: catalog.into(),
            schema: schema.into(),
            owner,
        }
    }

    /// Starting point for a newly added schema rule: owner of `hive.default`
    pub fn template() -> Self {
        Self::new("hive", "default", true)
    }
}

/// Table privilege rule
///
/// Privileges are kept as raw tokens so documents written by newer tools
/// survive a load/save cycle; unknown tokens are ignored during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRule {
    #[serde(flatten)]
    pub identity: IdentityFilter,

    pub catalog: String,

    pub schema: String,

    pub table: String,

    #[serde(default)]
    pub privileges: Vec<String>,
}

impl TableRule {
    pub fn new<I>(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
        privileges: I,
    ) -> Self
    where
        I: IntoIterator<Item = Privilege>,
    {
        Self {
            identity: IdentityFilter::any(),
            catalog: catalog.into(),
            schema: schema.into(),
            table: table.into(),
            privileges: privileges.into_iter().map(|p| p.as_str().to_string()).collect(),
        }
    }

    /// Starting point for a newly added table rule: `SELECT` on `hive.default.*`
    pub fn template() -> Self {
        Self::new("hive", "default", ".*", [Privilege::Select])
    }

    /// Declared privileges restricted to the known privilege set
    pub fn known_privileges(&self) -> PrivilegeSet {
        self.privileges
            .iter()
            .filter_map(|token| Privilege::from_token(token))
            .collect()
    }
}

/// Function execution rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRule {
    #[serde(flatten)]
    pub identity: IdentityFilter,

    pub catalog: String,

    pub function: String,

    #[serde(default = "default_true")]
    pub execute: bool,
}

/// Procedure execution rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureRule {
    #[serde(flatten)]
    pub identity: IdentityFilter,

    pub catalog: String,

    pub procedure: String,

    #[serde(default = "default_true")]
    pub execute: bool,
}

/// Session property rule; without a catalog it targets system properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPropertyRule {
    #[serde(flatten)]
    pub identity: IdentityFilter,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    pub property: String,

    #[serde(default = "default_true")]
    pub allow: bool,
}

/// Query execution rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRule {
    #[serde(flatten)]
    pub identity: IdentityFilter,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default = "default_true")]
    pub allow: bool,
}

/// System information access rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInformationRule {
    #[serde(flatten)]
    pub identity: IdentityFilter,

    #[serde(default = "default_true")]
    pub allow: bool,
}

/// Impersonation rule: `principal` may act as `user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpersonationRule {
    pub principal: String,

    pub user: String,

    #[serde(default = "default_true")]
    pub allow: bool,
}

macro_rules! identity_rule {
    ($($rule:ty),+ $(,)?) => {
        $(
            impl IdentityRule for $rule {
                fn identity(&self) -> &IdentityFilter {
                    &self.identity
                }

                fn identity_mut(&mut self) -> &mut IdentityFilter {
                    &mut self.identity
                }
            }
        )+
    };
}

identity_rule!(
    CatalogRule,
    SchemaRule,
    TableRule,
    FunctionRule,
    ProcedureRule,
    SessionPropertyRule,
    QueryRule,
    SystemInformationRule,
);

impl Rule for CatalogRule {
    fn patterns(&self) -> Vec<(&'static str, &str)> {
        let mut patterns: Vec<_> = self.identity.patterns().collect();
        patterns.push(("catalog", &self.catalog));
        patterns
    }
}

impl Rule for SchemaRule {
    fn patterns(&self) -> Vec<(&'static str, &str)> {
        let mut patterns: Vec<_> = self.identity.patterns().collect();
        patterns.push(("catalog", &self.catalog));
        patterns.push(("schema", &self.schema));
        patterns
    }
}

impl Rule for TableRule {
    fn patterns(&self) -> Vec<(&'static str, &str)> {
        let mut patterns: Vec<_> = self.identity.patterns().collect();
        patterns.push(("catalog", &self.catalog));
        patterns.push(("schema", &self.schema));
        patterns.push(("table", &self.table));
        patterns
    }
}

impl Rule for FunctionRule {
    fn patterns(&self) -> Vec<(&'static str, &str)> {
        let mut patterns: Vec<_> = self.identity.patterns().collect();
        patterns.push(("catalog", &self.catalog));
        patterns.push(("function", &self.function));
        patterns
    }
}

impl Rule for ProcedureRule {
    fn patterns(&self) -> Vec<(&'static str, &str)> {
        let mut patterns: Vec<_> = self.identity.patterns().collect();
        patterns.push(("catalog", &self.catalog));
        patterns.push(("procedure", &self.procedure));
        patterns
    }
}

impl Rule for SessionPropertyRule {
    fn patterns(&self) -> Vec<(&'static str, &str)> {
        let mut patterns: Vec<_> = self.identity.patterns().collect();
        if let Some(catalog) = &self.catalog {
            patterns.push(("catalog", catalog));
        }
        patterns.push(("property", &self.property));
        patterns
    }
}

impl Rule for QueryRule {
    fn patterns(&self) -> Vec<(&'static str, &str)> {
        let mut patterns: Vec<_> = self.identity.patterns().collect();
        if let Some(query) = &self.query {
            patterns.push(("query", query));
        }
        patterns
    }
}

impl Rule for SystemInformationRule {
    fn patterns(&self) -> Vec<(&'static str, &str)> {
        self.identity.patterns().collect()
    }
}

impl Rule for ImpersonationRule {
    fn patterns(&self) -> Vec<(&'static str, &str)> {
        vec![("principal", &self.principal), ("user", &self.user)]
    }
}
