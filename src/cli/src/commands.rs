//! Subcommand implementations

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};
use trino_acl::rules::FallbackPattern;
use trino_acl::{
    AccessEngine, AccessRequest, EffectiveAccess, FileRuleSource, Principal, RuleKind, RuleSet,
    RuleSource,
};

/// Load the rule document at `path`
pub async fn load_rules(path: &Path) -> Result<RuleSet> {
    let source = FileRuleSource::new(path);
    let rules = source
        .fetch()
        .await
        .with_context(|| format!("Failed to load rules from {}", path.display()))?;

    debug!("Loaded {} catalog rules from {}", rules.catalogs.len(), path.display());
    Ok(rules)
}

/// Normalize comma-separated membership values
///
/// Entries are trimmed and blanks dropped, so `"a, ,b"` yields `{a, b}`.
pub fn parse_members(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|member| !member.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a request from command-line arguments
///
/// Only membership lists are normalized; the user and coordinates are used
/// as given, with an empty schema or table treated as absent.
pub fn build_request(
    user: &str,
    groups: &[String],
    roles: &[String],
    catalog: &str,
    schema: Option<&str>,
    table: Option<&str>,
) -> AccessRequest {
    let principal = Principal::new(user)
        .with_groups(parse_members(groups))
        .with_roles(parse_members(roles));

    let mut request = AccessRequest::new(principal, catalog);
    if let Some(schema) = schema.filter(|s| !s.is_empty()) {
        request = request.with_schema(schema);
    }
    if let Some(table) = table.filter(|t| !t.is_empty()) {
        request = request.with_table(table);
    }
    request
}

/// Evaluate one request against a rule set
pub fn evaluate(rules: RuleSet, request: &AccessRequest) -> EffectiveAccess {
    let engine = AccessEngine::with_rules(rules);
    let access = engine.check(request);

    info!(
        "Evaluated {} on catalog {}: visible={}",
        request.principal.user, request.catalog, access.visible
    );
    access
}

/// Read a JSON access request from a file, or stdin when `path` is `-`
pub fn read_request(path: &Path) -> Result<AccessRequest> {
    let json = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read request from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?
    };

    serde_json::from_str(&json).context("Failed to parse access request")
}

/// Summary printed by `validate`
#[derive(Debug)]
pub struct ValidationReport {
    pub counts: Vec<(RuleKind, usize)>,
    pub fallbacks: Vec<FallbackPattern>,
}

impl ValidationReport {
    pub fn from_rules(rules: &RuleSet) -> Self {
        Self {
            counts: RuleKind::ALL
                .iter()
                .map(|kind| (*kind, rules.len_of(*kind)))
                .collect(),
            fallbacks: rules.fallback_patterns(),
        }
    }

    pub fn total_rules(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rules: {}", self.total_rules())?;
        for (kind, count) in &self.counts {
            writeln!(f, "  {:<20} {}", kind, count)?;
        }

        if self.fallbacks.is_empty() {
            write!(f, "All patterns compile as regular expressions")
        } else {
            writeln!(f, "Patterns matched literally ({}):", self.fallbacks.len())?;
            for (i, fallback) in self.fallbacks.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                write!(f, "  {}", fallback)?;
            }
            Ok(())
        }
    }
}

/// Normalized document text for `dump`
pub fn dump(rules: &RuleSet, wrap: bool) -> Result<String> {
    rules
        .to_json_pretty(wrap)
        .context("Failed to serialize rules")
}
