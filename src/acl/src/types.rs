//! Core access-control types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Set of table privileges, ordered by declaration
pub type PrivilegeSet = BTreeSet<Privilege>;

/// Principal making a request (authenticated user plus memberships)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User name
    pub user: String,

    /// Group memberships
    #[serde(default)]
    pub groups: BTreeSet<String>,

    /// Role memberships
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl Principal {
    /// Create a principal with no group or role memberships
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            groups: BTreeSet::new(),
            roles: BTreeSet::new(),
        }
    }

    /// Add a group membership
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    /// Add several group memberships
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Add a role membership
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Add several role memberships
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }
}

/// Table privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Privilege {
    Select,
    Insert,
    Delete,
    Update,
    Ownership,
    GrantSelect,
    CreateView,
}

impl Privilege {
    /// Every known privilege, in declaration order
    pub const ALL: [Privilege; 7] = [
        Privilege::Select,
        Privilege::Insert,
        Privilege::Delete,
        Privilege::Update,
        Privilege::Ownership,
        Privilege::GrantSelect,
        Privilege::CreateView,
    ];

    /// Token used in rule documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Privilege::Select => "SELECT",
            Privilege::Insert => "INSERT",
            Privilege::Delete => "DELETE",
            Privilege::Update => "UPDATE",
            Privilege::Ownership => "OWNERSHIP",
            Privilege::GrantSelect => "GRANT_SELECT",
            Privilege::CreateView => "CREATE_VIEW",
        }
    }

    /// Parse a document token; unknown tokens yield `None`
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == token)
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog-level access granted by a catalog rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogAccess {
    /// Full access to the catalog
    All,
    /// Read access plus view creation
    ReadOnly,
    /// Catalog is hidden
    #[default]
    None,
}

impl CatalogAccess {
    /// Privileges implied by this access level
    pub fn privileges(&self) -> PrivilegeSet {
        match self {
            CatalogAccess::All => Privilege::ALL.into_iter().collect(),
            CatalogAccess::ReadOnly => [Privilege::Select, Privilege::CreateView].into_iter().collect(),
            CatalogAccess::None => PrivilegeSet::new(),
        }
    }

    /// Whether the catalog is visible at all
    pub fn is_visible(&self) -> bool {
        !matches!(self, CatalogAccess::None)
    }

    /// Token used in rule documents
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogAccess::All => "all",
            CatalogAccess::ReadOnly => "read-only",
            CatalogAccess::None => "none",
        }
    }
}

impl fmt::Display for CatalogAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
