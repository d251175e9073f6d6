//! Cache keys
//!
//! A resource's list view and its single records live under disjoint keys.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Every record of a resource
    List { resource: String },
    /// One record of a resource
    Record { resource: String, id: String },
}

impl CacheKey {
    pub fn list(resource: impl Into<String>) -> Self {
        CacheKey::List {
            resource: resource.into(),
        }
    }

    pub fn record(resource: impl Into<String>, id: impl Into<String>) -> Self {
        CacheKey::Record {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn resource(&self) -> &str {
        match self {
            CacheKey::List { resource } | CacheKey::Record { resource, .. } => resource,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, CacheKey::List { .. })
    }

    /// Storage key: `{prefix}:{resource}:list` or `{prefix}:{resource}:record:{id}`
    pub fn render(&self, prefix: &str) -> String {
        format!("{}:{}", prefix, self)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::List { resource } => write!(f, "{}:list", resource),
            CacheKey::Record { resource, id } => write!(f, "{}:record:{}", resource, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_and_record_keys_are_disjoint() {
        let list = CacheKey::list("users");
        let record = CacheKey::record("users", "list");

        assert_ne!(list, record);
        assert_ne!(list.render("app"), record.render("app"));
        assert_eq!(list.render("app"), "app:users:list");
        assert_eq!(record.render("app"), "app:users:record:list");
        assert_eq!(record.resource(), "users");
        assert!(list.is_list());
    }
}
