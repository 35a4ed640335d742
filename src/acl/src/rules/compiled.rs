//! Rule sets with every pattern compiled once, ready for evaluation

use super::{CatalogRule, FallbackPattern, RuleKind, RuleSet, SchemaRule, TableRule};
use crate::identity::IdentityMatcher;
use crate::pattern::Pattern;
use crate::types::PrivilegeSet;
use tracing::warn;

/// Catalog rule with compiled patterns
#[derive(Debug, Clone)]
pub struct CompiledCatalogRule {
    pub index: usize,
    pub identity: IdentityMatcher,
    pub catalog: Pattern,
    pub rule: CatalogRule,
}

/// Schema rule with compiled patterns
#[derive(Debug, Clone)]
pub struct CompiledSchemaRule {
    pub index: usize,
    pub identity: IdentityMatcher,
    pub catalog: Pattern,
    pub schema: Pattern,
    pub rule: SchemaRule,
}

/// Table rule with compiled patterns and its known privileges
#[derive(Debug, Clone)]
pub struct CompiledTableRule {
    pub index: usize,
    pub identity: IdentityMatcher,
    pub catalog: Pattern,
    pub schema: Pattern,
    pub table: Pattern,
    pub privileges: PrivilegeSet,
    pub rule: TableRule,
}

/// Immutable, evaluation-ready form of a [`RuleSet`]
///
/// Only the catalog, schema and table lists take part in evaluation; the
/// source rule set is kept whole for serialization.
#[derive(Debug, Clone)]
pub struct CompiledRuleSet {
    source: RuleSet,
    catalogs: Vec<CompiledCatalogRule>,
    schemas: Vec<CompiledSchemaRule>,
    tables: Vec<CompiledTableRule>,
}

impl CompiledRuleSet {
    /// Compile every evaluated pattern in the rule set
    pub fn compile(source: RuleSet) -> Self {
        let catalogs = source
            .catalogs
            .iter()
            .enumerate()
            .map(|(index, rule)| CompiledCatalogRule {
                index,
                identity: IdentityMatcher::compile(&rule.identity),
                catalog: Pattern::compile(&rule.catalog),
                rule: rule.clone(),
            })
            .collect();

        let schemas = source
            .schemas
            .iter()
            .enumerate()
            .map(|(index, rule)| CompiledSchemaRule {
                index,
                identity: IdentityMatcher::compile(&rule.identity),
                catalog: Pattern::compile(&rule.catalog),
                schema: Pattern::compile(&rule.schema),
                rule: rule.clone(),
            })
            .collect();

        let tables = source
            .tables
            .iter()
            .enumerate()
            .map(|(index, rule)| CompiledTableRule {
                index,
                identity: IdentityMatcher::compile(&rule.identity),
                catalog: Pattern::compile(&rule.catalog),
                schema: Pattern::compile(&rule.schema),
                table: Pattern::compile(&rule.table),
                privileges: rule.known_privileges(),
                rule: rule.clone(),
            })
            .collect();

        let compiled = Self {
            source,
            catalogs,
            schemas,
            tables,
        };

        for fallback in compiled.literal_patterns() {
            warn!("Pattern is not a valid regex, matching literally: {}", fallback);
        }

        compiled
    }

    /// Compiled patterns of the evaluated lists that fell back to literal matching
    pub fn literal_patterns(&self) -> Vec<FallbackPattern> {
        let mut found = Vec::new();

        for rule in &self.catalogs {
            let fields = rule.identity.patterns().chain([("catalog", &rule.catalog)]);
            collect_literals(&mut found, RuleKind::Catalogs, rule.index, fields);
        }
        for rule in &self.schemas {
            let fields = rule
                .identity
                .patterns()
                .chain([("catalog", &rule.catalog), ("schema", &rule.schema)]);
            collect_literals(&mut found, RuleKind::Schemas, rule.index, fields);
        }
        for rule in &self.tables {
            let fields = rule.identity.patterns().chain([
                ("catalog", &rule.catalog),
                ("schema", &rule.schema),
                ("table", &rule.table),
            ]);
            collect_literals(&mut found, RuleKind::Tables, rule.index, fields);
        }

        found
    }

    /// Compiled rule set with no rules
    pub fn empty() -> Self {
        Self::compile(RuleSet::empty())
    }

    /// Rule set this was compiled from
    pub fn source(&self) -> &RuleSet {
        &self.source
    }

    pub fn catalogs(&self) -> &[CompiledCatalogRule] {
        &self.catalogs
    }

    pub fn schemas(&self) -> &[CompiledSchemaRule] {
        &self.schemas
    }

    pub fn tables(&self) -> &[CompiledTableRule] {
        &self.tables
    }
}

fn collect_literals<'a>(
    found: &mut Vec<FallbackPattern>,
    kind: RuleKind,
    index: usize,
    fields: impl Iterator<Item = (&'static str, &'a Pattern)>,
) {
    found.extend(
        fields
            .filter(|(_, pattern)| pattern.is_literal())
            .map(|(field, pattern)| FallbackPattern {
                kind,
                index,
                field,
                pattern: pattern.as_str().to_string(),
            }),
    );
}

impl From<RuleSet> for CompiledRuleSet {
    fn from(source: RuleSet) -> Self {
        Self::compile(source)
    }
}
