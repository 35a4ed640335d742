//! Rule store: ordered rule lists per rule kind
//!
//! The position of a rule in its list is its precedence. Editing operations
//! only append or reorder; evaluation never mutates a rule set.

mod compiled;
mod document;
mod model;

pub use compiled::{CompiledCatalogRule, CompiledRuleSet, CompiledSchemaRule, CompiledTableRule};
pub use document::DATA_ENVELOPE;
pub use model::{
    CatalogRule, FunctionRule, IdentityRule, ImpersonationRule, ProcedureRule, QueryRule, Rule,
    SchemaRule, SessionPropertyRule, SystemInformationRule, TableRule,
};

use crate::error::{AclError, Result};
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete set of access-control rules
///
/// An empty rule set denies everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub catalogs: Vec<CatalogRule>,

    #[serde(default)]
    pub schemas: Vec<SchemaRule>,

    #[serde(default)]
    pub tables: Vec<TableRule>,

    #[serde(default)]
    pub functions: Vec<FunctionRule>,

    #[serde(default)]
    pub procedures: Vec<ProcedureRule>,

    #[serde(default)]
    pub session_properties: Vec<SessionPropertyRule>,

    #[serde(default)]
    pub queries: Vec<QueryRule>,

    #[serde(default)]
    pub system_information: Vec<SystemInformationRule>,

    #[serde(default)]
    pub impersonation: Vec<ImpersonationRule>,
}

/// Rule list within a rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Catalogs,
    Schemas,
    Tables,
    Functions,
    Procedures,
    SessionProperties,
    Queries,
    SystemInformation,
    Impersonation,
}

impl RuleKind {
    /// Every rule kind, in document order
    pub const ALL: [RuleKind; 9] = [
        RuleKind::Catalogs,
        RuleKind::Schemas,
        RuleKind::Tables,
        RuleKind::Functions,
        RuleKind::Procedures,
        RuleKind::SessionProperties,
        RuleKind::Queries,
        RuleKind::SystemInformation,
        RuleKind::Impersonation,
    ];

    /// Document field name of this list
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Catalogs => "catalogs",
            RuleKind::Schemas => "schemas",
            RuleKind::Tables => "tables",
            RuleKind::Functions => "functions",
            RuleKind::Procedures => "procedures",
            RuleKind::SessionProperties => "session_properties",
            RuleKind::Queries => "queries",
            RuleKind::SystemInformation => "system_information",
            RuleKind::Impersonation => "impersonation",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pattern that is not a valid regular expression and is matched literally
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackPattern {
    pub kind: RuleKind,
    pub index: usize,
    pub field: &'static str,
    pub pattern: String,
}

impl fmt::Display for FallbackPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}].{} = {:?}", self.kind, self.index, self.field, self.pattern)
    }
}

impl RuleSet {
    /// Rule set with no rules (default deny)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether every rule list is empty
    pub fn is_empty(&self) -> bool {
        RuleKind::ALL.iter().all(|kind| self.len_of(*kind) == 0)
    }

    /// Number of rules in one list
    pub fn len_of(&self, kind: RuleKind) -> usize {
        match kind {
            RuleKind::Catalogs => self.catalogs.len(),
            RuleKind::Schemas => self.schemas.len(),
            RuleKind::Tables => self.tables.len(),
            RuleKind::Functions => self.functions.len(),
            RuleKind::Procedures => self.procedures.len(),
            RuleKind::SessionProperties => self.session_properties.len(),
            RuleKind::Queries => self.queries.len(),
            RuleKind::SystemInformation => self.system_information.len(),
            RuleKind::Impersonation => self.impersonation.len(),
        }
    }

    /// Append a catalog rule with the lowest precedence
    pub fn push_catalog(&mut self, rule: CatalogRule) -> &mut Self {
        self.catalogs.push(rule);
        self
    }

    /// Append a schema rule with the lowest precedence
    pub fn push_schema(&mut self, rule: SchemaRule) -> &mut Self {
        self.schemas.push(rule);
        self
    }

    /// Append a table rule with the lowest precedence
    pub fn push_table(&mut self, rule: TableRule) -> &mut Self {
        self.tables.push(rule);
        self
    }

    /// Move a rule within its list, shifting the rules in between
    ///
    /// # Errors
    ///
    /// Returns `AclError::InvalidInput` when either index is out of range.
    pub fn move_rule(&mut self, kind: RuleKind, from: usize, to: usize) -> Result<()> {
        match kind {
            RuleKind::Catalogs => move_within(&mut self.catalogs, kind, from, to),
            RuleKind::Schemas => move_within(&mut self.schemas, kind, from, to),
            RuleKind::Tables => move_within(&mut self.tables, kind, from, to),
            RuleKind::Functions => move_within(&mut self.functions, kind, from, to),
            RuleKind::Procedures => move_within(&mut self.procedures, kind, from, to),
            RuleKind::SessionProperties => move_within(&mut self.session_properties, kind, from, to),
            RuleKind::Queries => move_within(&mut self.queries, kind, from, to),
            RuleKind::SystemInformation => move_within(&mut self.system_information, kind, from, to),
            RuleKind::Impersonation => move_within(&mut self.impersonation, kind, from, to),
        }
    }

    /// Every pattern in the rule set that falls back to literal matching
    pub fn fallback_patterns(&self) -> Vec<FallbackPattern> {
        let mut found = Vec::new();
        collect_fallbacks(&mut found, RuleKind::Catalogs, &self.catalogs);
        collect_fallbacks(&mut found, RuleKind::Schemas, &self.schemas);
        collect_fallbacks(&mut found, RuleKind::Tables, &self.tables);
        collect_fallbacks(&mut found, RuleKind::Functions, &self.functions);
        collect_fallbacks(&mut found, RuleKind::Procedures, &self.procedures);
        collect_fallbacks(&mut found, RuleKind::SessionProperties, &self.session_properties);
        collect_fallbacks(&mut found, RuleKind::Queries, &self.queries);
        collect_fallbacks(&mut found, RuleKind::SystemInformation, &self.system_information);
        collect_fallbacks(&mut found, RuleKind::Impersonation, &self.impersonation);
        found
    }
}

fn move_within<T>(rules: &mut Vec<T>, kind: RuleKind, from: usize, to: usize) -> Result<()> {
    let len = rules.len();
    if from >= len || to >= len {
        return Err(AclError::InvalidInput(format!(
            "Cannot move {} rule {} to {}: list has {} rules",
            kind, from, to, len
        )));
    }

    let rule = rules.remove(from);
    rules.insert(to, rule);
    Ok(())
}

fn collect_fallbacks<R: Rule>(found: &mut Vec<FallbackPattern>, kind: RuleKind, rules: &[R]) {
    for (index, rule) in rules.iter().enumerate() {
        for (field, pattern) in rule.patterns() {
            if !pattern.is_empty() && Pattern::compile(pattern).is_literal() {
                found.push(FallbackPattern {
                    kind,
                    index,
                    field,
                    pattern: pattern.to_string(),
                });
            }
        }
    }
}
