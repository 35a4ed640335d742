//! Identity filters and principal matching
//!
//! Every rule kind except impersonation carries an optional user, group and
//! role pattern. The three are combined with OR: a rule naming both a user and
//! a group applies when either one matches. A filter with none of them set
//! applies to every principal.

use crate::pattern::Pattern;
use crate::types::Principal;
use serde::{Deserialize, Serialize};

/// Identity filter as written in a rule document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityFilter {
    /// User name pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Group name pattern, matched against every group of the principal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Role name pattern, matched against every role of the principal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl IdentityFilter {
    /// Filter that matches every principal
    pub fn any() -> Self {
        Self::default()
    }

    /// Whether no identity field is set
    pub fn is_unrestricted(&self) -> bool {
        self.user.is_none() && self.group.is_none() && self.role.is_none()
    }

    /// Iterate over the identity patterns that are set, with their field names
    pub fn patterns(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [("user", &self.user), ("group", &self.group), ("role", &self.role)]
            .into_iter()
            .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
    }
}

/// Compiled identity filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityMatcher {
    user: Option<Pattern>,
    group: Option<Pattern>,
    role: Option<Pattern>,
    unrestricted: bool,
}

impl IdentityMatcher {
    /// Compile an identity filter
    ///
    /// An empty pattern string counts as "set" for the wildcard check but
    /// never matches anything.
    pub fn compile(filter: &IdentityFilter) -> Self {
        let compile = |field: &Option<String>| {
            field
                .as_deref()
                .filter(|pattern| !pattern.is_empty())
                .map(Pattern::compile)
        };

        Self {
            user: compile(&filter.user),
            group: compile(&filter.group),
            role: compile(&filter.role),
            unrestricted: filter.is_unrestricted(),
        }
    }

    /// Compiled identity patterns, with their field names
    pub fn patterns(&self) -> impl Iterator<Item = (&'static str, &Pattern)> {
        [("user", &self.user), ("group", &self.group), ("role", &self.role)]
            .into_iter()
            .filter_map(|(field, pattern)| pattern.as_ref().map(|p| (field, p)))
    }

    /// Check whether the principal satisfies this filter
    pub fn matches(&self, principal: &Principal) -> bool {
        if self.unrestricted {
            return true;
        }

        let user_matches = self
            .user
            .as_ref()
            .is_some_and(|pattern| pattern.matches(&principal.user));
        let group_matches = self
            .group
            .as_ref()
            .is_some_and(|pattern| principal.groups.iter().any(|g| pattern.matches(g)));
        let role_matches = self
            .role
            .as_ref()
            .is_some_and(|pattern| principal.roles.iter().any(|r| pattern.matches(r)));

        user_matches || group_matches || role_matches
    }
}

/// Match a principal against an identity filter without caching the patterns
pub fn matches(filter: &IdentityFilter, principal: &Principal) -> bool {
    IdentityMatcher::compile(filter).matches(principal)
}
