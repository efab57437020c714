//! The runtime-visible store the styling layer reads from.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::brand::TokenSet;

/// Where applied selections are published.
///
/// The equivalent of global data attributes and style variables on a
/// document root: the styling layer reads them and picks up changes without
/// components re-rendering.
pub trait Environment: Send {
    fn set_attribute(&mut self, name: &str, value: &str);
    fn remove_attribute(&mut self, name: &str);
    /// Replaces all published token values.
    fn write_tokens(&mut self, tokens: &TokenSet);
}

/// Names of the brand and mode attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeNames {
    pub brand: String,
    pub mode: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            brand: "data-brand".to_string(),
            mode: "data-theme".to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct RootState {
    attributes: IndexMap<String, String>,
    tokens: TokenSet,
    writes: u64,
}

/// In-process [`Environment`]: shared attributes and token values.
///
/// Clones are handles to the same state, so the rendering layer keeps one
/// and the engine writes through another.
///
/// ```rust
/// use pulse_theme::{Environment, RootAttributes, TokenSet};
///
/// let root = RootAttributes::new();
/// let mut writer = root.clone();
/// writer.set_attribute("data-theme", "dark");
/// writer.write_tokens(&TokenSet::new().with("primary", "#78a9ff"));
///
/// assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));
/// assert_eq!(root.token("primary"), "#78a9ff");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RootAttributes {
    state: Arc<RwLock<RootState>>,
}

impl RootAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.read().attributes.get(name).cloned()
    }

    /// Attributes in the order they were first set.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.read()
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// A published token value, `""` when not defined.
    pub fn token(&self, name: &str) -> String {
        self.read().tokens.value_or_empty(name).to_string()
    }

    pub fn tokens(&self) -> TokenSet {
        self.read().tokens.clone()
    }

    /// How many writes have been published. Lets readers detect changes.
    pub fn writes(&self) -> u64 {
        self.read().writes
    }

    fn read(&self) -> RwLockReadGuard<'_, RootState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RootState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Environment for RootAttributes {
    fn set_attribute(&mut self, name: &str, value: &str) {
        let mut state = self.write();
        state.attributes.insert(name.to_string(), value.to_string());
        state.writes += 1;
    }

    fn remove_attribute(&mut self, name: &str) {
        let mut state = self.write();
        state.attributes.shift_remove(name);
        state.writes += 1;
    }

    fn write_tokens(&mut self, tokens: &TokenSet) {
        let mut state = self.write();
        state.tokens = tokens.clone();
        state.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let root = RootAttributes::new();
        let mut writer = root.clone();

        writer.set_attribute("data-brand", "ibm");
        assert_eq!(root.attribute("data-brand").as_deref(), Some("ibm"));

        writer.remove_attribute("data-brand");
        assert_eq!(root.attribute("data-brand"), None);
        assert_eq!(root.writes(), 2);
    }

    #[test]
    fn test_write_tokens_replaces_all() {
        let mut root = RootAttributes::new();
        root.write_tokens(&TokenSet::new().with("a", "1").with("b", "2"));
        root.write_tokens(&TokenSet::new().with("a", "3"));

        assert_eq!(root.token("a"), "3");
        assert_eq!(root.token("b"), "");
        assert_eq!(root.tokens().len(), 1);
    }

    #[test]
    fn test_default_attribute_names() {
        let names = AttributeNames::default();
        assert_eq!(names.brand, "data-brand");
        assert_eq!(names.mode, "data-theme");
    }
}
