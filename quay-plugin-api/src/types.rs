//! Plugin identity and UI contribution value types

use serde::Serialize;

use crate::error::PluginError;

/// Identity a plugin reports once resolved from its bundle.
///
/// The `id` is the registry key and must be unique across all loaded
/// plugins; the remaining fields are descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginIdentity {
    /// Unique plugin id (e.g. "example-dashboard")
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Vendor or author
    pub vendor: String,
    /// Plugin version (semver by convention)
    pub version: String,
    /// Human-readable description
    pub description: String,
}

impl Default for PluginIdentity {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            vendor: String::new(),
            version: "0.0.1".to_string(),
            description: String::new(),
        }
    }
}

/// One entry a plugin contributes to the main application menu.
///
/// Immutable once constructed; two items are equal when their `(name, path)`
/// pair is equal, the icon is presentation-only.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationItem {
    name: String,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
}

impl NavigationItem {
    /// Create a navigation item. Name and path must be non-empty after
    /// trimming.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Result<Self, PluginError> {
        let name = name.into();
        let path = path.into();
        if name.trim().is_empty() {
            return Err(PluginError::InvalidNavigation(
                "navigation item name cannot be empty".to_string(),
            ));
        }
        if path.trim().is_empty() {
            return Err(PluginError::InvalidNavigation(
                "navigation item path cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            name,
            path,
            icon: None,
        })
    }

    /// Attach an icon identifier.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Display name shown in the menu.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Route path the item links to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Optional icon identifier.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }
}

impl PartialEq for NavigationItem {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.path == other.path
    }
}

impl Eq for NavigationItem {}

impl std::hash::Hash for NavigationItem {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.path.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_default_version() {
        let identity = PluginIdentity::default();
        assert_eq!(identity.version, "0.0.1");
        assert!(identity.id.is_empty());
    }

    #[test]
    fn test_navigation_item_construction() {
        let item = NavigationItem::new("Dashboard", "/ui/plugin/x").unwrap();
        assert_eq!(item.name(), "Dashboard");
        assert_eq!(item.path(), "/ui/plugin/x");
        assert!(item.icon().is_none());

        let item = item.with_icon("icon-x");
        assert_eq!(item.icon(), Some("icon-x"));
    }

    #[test]
    fn test_navigation_item_rejects_empty_name() {
        assert!(NavigationItem::new("", "/path").is_err());
        assert!(NavigationItem::new("   ", "/path").is_err());
    }

    #[test]
    fn test_navigation_item_rejects_empty_path() {
        assert!(NavigationItem::new("Name", "").is_err());
        assert!(NavigationItem::new("Name", "  ").is_err());
    }

    #[test]
    fn test_navigation_item_equality_ignores_icon() {
        let a = NavigationItem::new("Dash", "/x").unwrap().with_icon("a");
        let b = NavigationItem::new("Dash", "/x").unwrap().with_icon("b");
        let c = NavigationItem::new("Dash", "/y").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_navigation_item_hash_matches_equality() {
        use std::collections::HashSet;

        let a = NavigationItem::new("Dash", "/x").unwrap().with_icon("a");
        let b = NavigationItem::new("Dash", "/x").unwrap();

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_navigation_item_serialization_omits_missing_icon() {
        let item = NavigationItem::new("Dash", "/x").unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["name"], "Dash");
        assert_eq!(json["path"], "/x");
        assert!(json.get("icon").is_none());

        let item = item.with_icon("icon-x");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["icon"], "icon-x");
    }
}
