//! Capability checks for row-level actions
//!
//! The current actor's permissions are passed explicitly into the table
//! and drawer instead of being read from ambient session state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    View,
    Create,
    Edit,
    Delete,
}

impl Permission {
    pub fn all() -> &'static [Permission] {
        &[
            Permission::View,
            Permission::Create,
            Permission::Edit,
            Permission::Delete,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Permission::View => "view",
            Permission::Create => "create",
            Permission::Edit => "edit",
            Permission::Delete => "delete",
        }
    }
}

/// Set of capabilities granted to an actor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    granted: BTreeSet<Permission>,
}

impl PermissionSet {
    /// No capabilities at all
    pub fn none() -> Self {
        Self::default()
    }

    /// View only
    pub fn read_only() -> Self {
        Self::none().with(Permission::View)
    }

    /// Every capability
    pub fn full() -> Self {
        Permission::all().iter().copied().collect()
    }

    pub fn with(mut self, permission: Permission) -> Self {
        self.granted.insert(permission);
        self
    }

    pub fn without(mut self, permission: Permission) -> Self {
        self.granted.remove(&permission);
        self
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.granted.contains(&permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.granted.iter().copied()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            granted: iter.into_iter().collect(),
        }
    }
}

/// The user on whose behalf the table is rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub permissions: PermissionSet,
}

impl Actor {
    pub fn new(name: impl Into<String>, permissions: PermissionSet) -> Self {
        Self {
            name: name.into(),
            permissions,
        }
    }

    /// An actor allowed to do everything (local single-user tooling)
    pub fn system() -> Self {
        Self::new("system", PermissionSet::full())
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.allows(permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_set() {
        let set = PermissionSet::read_only();
        assert!(set.allows(Permission::View));
        assert!(!set.allows(Permission::Edit));
        assert!(!set.allows(Permission::Delete));
    }

    #[test]
    fn test_full_set_without_delete() {
        let set = PermissionSet::full().without(Permission::Delete);
        assert!(set.allows(Permission::Create));
        assert!(set.allows(Permission::Edit));
        assert!(!set.allows(Permission::Delete));
    }

    #[test]
    fn test_system_actor_can_everything() {
        let actor = Actor::system();
        assert!(Permission::all().iter().all(|p| actor.can(*p)));
    }
}
