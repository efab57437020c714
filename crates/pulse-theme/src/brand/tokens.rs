//! Token sets: named design values for one brand and mode.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// An immutable mapping from token name to value.
///
/// Keys are the names consumers index by (`"primary"`, `"spacing.md"`), and
/// values are the raw strings the styling layer understands: hex colors,
/// dimensions, CSS function strings or bare numbers.
///
/// Iteration follows the order the tokens were authored in. Equality ignores
/// order.
///
/// ```rust
/// use pulse_theme::TokenSet;
///
/// let tokens = TokenSet::new()
///     .with("primary", "#0f62fe")
///     .with("spacing.md", "16px");
///
/// assert_eq!(tokens.get("primary"), Some("#0f62fe"));
/// assert_eq!(tokens.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenSet(IndexMap<String, String>);

impl TokenSet {
    /// Creates an empty token set.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Adds a token, returning the updated set for chaining.
    ///
    /// Token sets are built once when a brand is authored; there is no
    /// in-place mutation after registration.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns the value of a token, if defined.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns the value of a token, or `""` when it is not defined.
    pub fn value_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(name, value)` pairs in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Fills in tokens this set leaves undefined from `defaults`.
    ///
    /// Tokens defined here always win. Keys are never renamed.
    pub fn inherit_from(&self, defaults: &TokenSet) -> TokenSet {
        let mut merged = defaults.0.clone();
        for (name, value) in &self.0 {
            merged.insert(name.clone(), value.clone());
        }
        TokenSet(merged)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TokenSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Raw token values accepted from brand documents. Numbers and booleans are
/// kept as their textual form.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTokenValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl RawTokenValue {
    fn into_text(self) -> String {
        match self {
            RawTokenValue::Text(s) => s,
            RawTokenValue::Number(n) => n.to_string(),
            RawTokenValue::Flag(b) => b.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for TokenSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, RawTokenValue>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .map(|(name, value)| (name, value.into_text()))
                .collect(),
        ))
    }
}
