//! Persistence of the user's last brand and mode choice.
//!
//! The preference lives in two string entries of a [`PreferenceStore`]: one
//! for the brand id, one for the mode. "No brand" is written as the reserved
//! literal [`NO_BRAND_ID`] because storage has no way to say "absent".
//!
//! Persistence is an optimization, not a requirement. Every storage failure
//! is logged and swallowed: reads fall back to the caller's defaults, writes
//! are dropped. The engine behaves correctly with storage entirely disabled.

mod store;

use serde::{Deserialize, Serialize};

use crate::brand::NO_BRAND_ID;
use crate::mode::ThemeMode;
use crate::selection::Selection;

pub use store::{FileStore, MemoryStore, PreferenceStore, StoreError, UnavailableStore};

/// Storage keys of the two preference entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub brand: String,
    pub mode: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            brand: "pulseui-brand".to_string(),
            mode: "pulseui-theme".to_string(),
        }
    }
}

/// Reads and writes a [`Selection`] through a store, tolerating failures.
pub struct PreferenceAdapter {
    store: Box<dyn PreferenceStore>,
    keys: StorageKeys,
}

impl std::fmt::Debug for PreferenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceAdapter")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl PreferenceAdapter {
    pub fn new(store: impl PreferenceStore + 'static) -> Self {
        Self::with_keys(store, StorageKeys::default())
    }

    pub fn with_keys(store: impl PreferenceStore + 'static, keys: StorageKeys) -> Self {
        Self {
            store: Box::new(store),
            keys,
        }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Reads the stored preference.
    ///
    /// Each entry falls back to the matching field of `defaults` when it is
    /// missing, unreadable or corrupt. Never fails.
    pub fn read_preference(&self, defaults: &Selection) -> Selection {
        let brand_id = match self.store.get(&self.keys.brand) {
            Ok(None) => defaults.brand_id.clone(),
            Ok(Some(value)) if value == NO_BRAND_ID => None,
            Ok(Some(value)) if value.trim().is_empty() => {
                tracing::warn!(key = %self.keys.brand, "stored brand is empty, using default");
                defaults.brand_id.clone()
            }
            Ok(Some(value)) => Some(value),
            Err(e) => {
                tracing::warn!(key = %self.keys.brand, error = %e, "could not read stored brand");
                defaults.brand_id.clone()
            }
        };

        let mode = match self.store.get(&self.keys.mode) {
            Ok(None) => defaults.mode,
            Ok(Some(value)) => value.parse::<ThemeMode>().unwrap_or_else(|e| {
                tracing::warn!(key = %self.keys.mode, error = %e, "stored mode is corrupt, using default");
                defaults.mode
            }),
            Err(e) => {
                tracing::warn!(key = %self.keys.mode, error = %e, "could not read stored mode");
                defaults.mode
            }
        };

        Selection { brand_id, mode }
    }

    /// Stores the preference, best effort.
    pub fn write_preference(&mut self, preference: &Selection) {
        let brand = preference.brand_id.as_deref().unwrap_or(NO_BRAND_ID);
        if let Err(e) = self.store.set(&self.keys.brand, brand) {
            tracing::warn!(key = %self.keys.brand, error = %e, "could not store brand");
        }
        if let Err(e) = self.store.set(&self.keys.mode, preference.mode.as_str()) {
            tracing::warn!(key = %self.keys.mode, error = %e, "could not store mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Selection {
        Selection::new(None, ThemeMode::Light)
    }

    #[test]
    fn test_empty_store_returns_defaults() {
        let adapter = PreferenceAdapter::new(MemoryStore::new());
        let fallback = Selection::new(Some("ibm"), ThemeMode::Dark);
        assert_eq!(adapter.read_preference(&fallback), fallback);
    }

    #[test]
    fn test_write_then_read() {
        let store = MemoryStore::new();
        let mut adapter = PreferenceAdapter::new(store.clone());
        adapter.write_preference(&Selection::new(Some("ibm"), ThemeMode::Dark));

        assert_eq!(store.entry("pulseui-brand").as_deref(), Some("ibm"));
        assert_eq!(store.entry("pulseui-theme").as_deref(), Some("dark"));
        assert_eq!(
            adapter.read_preference(&defaults()),
            Selection::new(Some("ibm"), ThemeMode::Dark)
        );
    }

    #[test]
    fn test_no_brand_round_trips_through_sentinel() {
        let store = MemoryStore::new();
        let mut adapter = PreferenceAdapter::new(store.clone());
        adapter.write_preference(&Selection::new(None, ThemeMode::Dark));

        assert_eq!(store.entry("pulseui-brand").as_deref(), Some(NO_BRAND_ID));
        let read = adapter.read_preference(&Selection::new(Some("ibm"), ThemeMode::Light));
        assert_eq!(read, Selection::new(None, ThemeMode::Dark));
    }

    #[test]
    fn test_corrupt_values_fall_back_per_entry() {
        let store = MemoryStore::with_entries([("pulseui-brand", "acme"), ("pulseui-theme", "sepia")]);
        let adapter = PreferenceAdapter::new(store);
        let read = adapter.read_preference(&defaults());
        assert_eq!(read, Selection::new(Some("acme"), ThemeMode::Light));

        let store = MemoryStore::with_entries([("pulseui-brand", "  "), ("pulseui-theme", "dark")]);
        let adapter = PreferenceAdapter::new(store);
        let read = adapter.read_preference(&defaults());
        assert_eq!(read, Selection::new(None, ThemeMode::Dark));
    }

    #[test]
    fn test_unavailable_store_never_fails() {
        let mut adapter = PreferenceAdapter::new(UnavailableStore);
        let fallback = Selection::new(Some("ibm"), ThemeMode::Dark);

        adapter.write_preference(&Selection::new(None, ThemeMode::Light));
        assert_eq!(adapter.read_preference(&fallback), fallback);
    }

    #[test]
    fn test_custom_keys() {
        let store = MemoryStore::new();
        let keys = StorageKeys {
            brand: "app.brand".to_string(),
            mode: "app.mode".to_string(),
        };
        let mut adapter = PreferenceAdapter::with_keys(store.clone(), keys);
        adapter.write_preference(&Selection::new(Some("ibm"), ThemeMode::Light));
        assert_eq!(store.entry("app.brand").as_deref(), Some("ibm"));
        assert_eq!(store.entry("app.mode").as_deref(), Some("light"));
    }
}
