//! Common type definitions shared across the gateway.
//!
//! This module defines:
//! - Type aliases for backend entity IDs (UserId, TransactionId, etc.)
//! - The [`Resource`] enum naming each proxied backend collection
//! - The [`PermissionSet`] helper used by the route guard
//!
//! # ID Types
//!
//! The backend hands out integer primary keys, so every entity ID is an
//! `i64` wrapped in a type alias:
//!
//! - [`UserId`]: User account identifier
//! - [`TransactionId`]: Payment transaction identifier
//! - [`VendorId`]: Vendor identifier
//! - [`GroupId`]: Group identifier
//! - [`PermissionId`]: Permission record identifier
//!
//! # Permissions
//!
//! Authorization is codename-based: the backend attaches a flat list of
//! permission codenames (e.g. `view_users`, `edit_users`) to each user, and
//! protected pages declare the set of codenames they require. The guard
//! requires the user's set to be a superset of the required set.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// Type aliases for backend IDs
pub type UserId = i64;
pub type TransactionId = i64;
pub type VendorId = i64;
pub type GroupId = i64;
pub type PermissionId = i64;

/// Backend collections the gateway proxies. Doubles as the query-cache key
/// for list invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Users,
    Transactions,
    Vendors,
    Groups,
    Permissions,
    DashboardStats,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Users => write!(f, "users"),
            Resource::Transactions => write!(f, "transactions"),
            Resource::Vendors => write!(f, "vendors"),
            Resource::Groups => write!(f, "groups"),
            Resource::Permissions => write!(f, "permissions"),
            Resource::DashboardStats => write!(f, "dashboard_stats"),
        }
    }
}

/// A user's permission codenames, as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(HashSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self(HashSet::new())
    }

    /// True when this set contains every codename in `required`.
    /// An empty `required` slice is trivially satisfied.
    pub fn is_superset_of(&self, required: &[String]) -> bool {
        required.iter().all(|p| self.0.contains(p))
    }

    pub fn contains(&self, codename: &str) -> bool {
        self.0.contains(codename)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(codenames: Vec<String>) -> Self {
        Self(codenames.into_iter().collect())
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
