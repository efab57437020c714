//! In-memory store of known brand configs.
//!
//! # Design
//!
//! The registry only holds configs that passed validation; every insertion
//! path goes through [`BrandConfig::validate`] or the value-level validator.
//! It knows nothing about caching or the active selection: the
//! [`BrandLoader`](crate::BrandLoader) wraps it and evicts cache entries on
//! every mutation.
//!
//! # Sources
//!
//! - Programmatic configs via [`BrandRegistry::add`]
//! - Brand files in a directory via [`BrandRegistry::add_dir`]
//! - Compile-time bundles via [`BrandRegistry::from_embedded_entries`]
//!
//! Ids enumerate in insertion order. Re-adding an id replaces the config but
//! keeps its position.
//!
//! # Example
//!
//! ```rust
//! use pulse_theme::{BrandConfig, BrandRegistry, TokenSet};
//!
//! let mut registry = BrandRegistry::new();
//! registry
//!     .add(BrandConfig::new("ibm", "IBM", "1.0").with_light(TokenSet::new().with("primary", "#0f62fe")))
//!     .unwrap();
//!
//! assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["ibm"]);
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::config::{BrandConfig, BRAND_EXTENSIONS};
use super::error::{RegistryError, ValidationError};

/// Returns the extension priority for a filename (lower = higher priority).
fn extension_priority(name: &str) -> usize {
    BRAND_EXTENSIONS
        .iter()
        .position(|ext| name.ends_with(ext))
        .unwrap_or(usize::MAX)
}

fn strip_extension(name: &str) -> &str {
    BRAND_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name)
}

/// Registry of brand configs keyed by id.
#[derive(Debug, Clone, Default)]
pub struct BrandRegistry {
    brands: IndexMap<String, BrandConfig>,
}

impl BrandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a config.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the config id if the config is
    /// invalid. The registry is left unchanged.
    pub fn add(&mut self, config: BrandConfig) -> Result<(), ValidationError> {
        config.validate()?;
        self.brands.insert(config.id.clone(), config);
        Ok(())
    }

    /// Removes a config, returning it if it was registered.
    pub fn remove(&mut self, id: &str) -> Option<BrandConfig> {
        self.brands.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&BrandConfig> {
        self.brands.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.brands.contains_key(id)
    }

    /// Registered ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.brands.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BrandConfig> {
        self.brands.values()
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }

    pub fn clear(&mut self) {
        self.brands.clear();
    }

    /// Registers every brand file in a directory.
    ///
    /// Files are matched by [`BRAND_EXTENSIONS`]. When several files share a
    /// stem (`ibm.json`, `ibm.yaml`), only the higher-priority extension is
    /// read. Files are registered in filename order under the id they
    /// declare. Returns the registered ids.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be read or any brand file is invalid.
    /// Nothing from the directory is registered in that case.
    pub fn add_dir<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<String>, RegistryError> {
        let dir = path.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| RegistryError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files: Vec<(String, usize, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RegistryError::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let priority = extension_priority(file_name);
            if priority == usize::MAX {
                continue;
            }
            files.push((strip_extension(file_name).to_string(), priority, path.clone()));
        }

        files.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        files.dedup_by(|later, earlier| later.0 == earlier.0);

        let configs = files
            .iter()
            .map(|(_, _, path)| BrandConfig::from_file(path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut ids = Vec::with_capacity(configs.len());
        for config in configs {
            tracing::debug!(brand_id = %config.id, dir = %dir.display(), "registered brand file");
            ids.push(config.id.clone());
            self.brands.insert(config.id.clone(), config);
        }
        Ok(ids)
    }

    /// Creates a registry from embedded `(file name, content)` pairs.
    ///
    /// Typically fed with `include_str!` output. The file extension picks the
    /// parser; entries sharing a stem follow the same priority rule as
    /// [`add_dir`](Self::add_dir).
    ///
    /// ```rust
    /// use pulse_theme::BrandRegistry;
    ///
    /// let entries: &[(&str, &str)] = &[(
    ///     "acme.yaml",
    ///     "id: acme\nname: Acme\nversion: '1'\ntokens:\n  light: {}\n  dark: {}\n",
    /// )];
    /// let registry = BrandRegistry::from_embedded_entries(entries).unwrap();
    /// assert!(registry.contains("acme"));
    /// ```
    pub fn from_embedded_entries(entries: &[(&str, &str)]) -> Result<Self, RegistryError> {
        let mut sorted: Vec<_> = entries.iter().collect();
        sorted.sort_by(|(a, _), (b, _)| {
            strip_extension(a)
                .cmp(strip_extension(b))
                .then(extension_priority(a).cmp(&extension_priority(b)))
        });
        sorted.dedup_by(|(later, _), (earlier, _)| strip_extension(later) == strip_extension(earlier));

        let mut registry = Self::new();
        for (name, content) in sorted {
            let parsed = if name.ends_with(".json") {
                BrandConfig::from_json(content)
            } else {
                BrandConfig::from_yaml(content)
            };
            let config = parsed.map_err(|e| RegistryError::Load {
                path: PathBuf::from(name),
                message: e.to_string(),
            })?;
            registry.brands.insert(config.id.clone(), config);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::error::ValidationIssue;
    use crate::brand::tokens::TokenSet;
    use std::fs;
    use tempfile::TempDir;

    fn brand(id: &str) -> BrandConfig {
        BrandConfig::new(id, id.to_uppercase(), "1.0")
            .with_light(TokenSet::new().with("primary", "#111"))
            .with_dark(TokenSet::new().with("primary", "#eee"))
    }

    fn brand_yaml(id: &str, primary: &str) -> String {
        format!(
            "id: {id}\nname: {id}\nversion: '1.0'\ntokens:\n  light:\n    primary: '{primary}'\n  dark:\n    primary: '{primary}'\n"
        )
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = BrandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut registry = BrandRegistry::new();
        for id in ["zeta", "alpha", "mid"] {
            registry.add(brand(id)).unwrap();
        }
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_readd_replaces_in_place() {
        let mut registry = BrandRegistry::new();
        registry.add(brand("a")).unwrap();
        registry.add(brand("b")).unwrap();
        registry.add(brand("a").with_description("v2")).unwrap();

        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().description, "v2");
    }

    #[test]
    fn test_add_invalid_leaves_registry_unchanged() {
        let mut registry = BrandRegistry::new();
        registry.add(brand("ibm")).unwrap();

        let err = registry.add(BrandConfig::new("ibm", "", "1.0")).unwrap_err();
        assert_eq!(err.id, "ibm");
        assert!(err.has_issue(&ValidationIssue::EmptyField("name")));
        assert_eq!(registry.get("ibm").unwrap().name, "IBM");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = BrandRegistry::new();
        registry.add(brand("a")).unwrap();
        registry.add(brand("b")).unwrap();
        registry.add(brand("c")).unwrap();

        assert!(registry.remove("b").is_some());
        assert!(registry.remove("b").is_none());
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_add_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("acme.yaml"), brand_yaml("acme", "#f00")).unwrap();
        fs::write(
            temp_dir.path().join("ibm.json"),
            brand("ibm").to_json().unwrap(),
        )
        .unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = BrandRegistry::new();
        let ids = registry.add_dir(temp_dir.path()).unwrap();

        assert_eq!(ids, vec!["acme", "ibm"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_add_dir_extension_priority() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("acme.yml"), brand_yaml("acme", "#yml")).unwrap();
        fs::write(temp_dir.path().join("acme.yaml"), brand_yaml("acme", "#yaml")).unwrap();

        let mut registry = BrandRegistry::new();
        registry.add_dir(temp_dir.path()).unwrap();

        let config = registry.get("acme").unwrap();
        assert_eq!(config.tokens.light.get("primary"), Some("#yaml"));
    }

    #[test]
    fn test_add_dir_invalid_file_registers_nothing() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.yaml"), brand_yaml("a", "#000")).unwrap();
        fs::write(temp_dir.path().join("b.yaml"), "id: b\nname: B\nversion: '1'\n").unwrap();

        let mut registry = BrandRegistry::new();
        let err = registry.add_dir(temp_dir.path()).unwrap_err();

        assert!(err.to_string().contains("b.yaml"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_dir_nonexistent() {
        let mut registry = BrandRegistry::new();
        let result = registry.add_dir("/nonexistent/brands");
        assert!(matches!(result, Err(RegistryError::Directory { .. })));
    }

    #[test]
    fn test_from_embedded_entries() {
        let ibm = brand("ibm").to_json().unwrap();
        let acme_yaml = brand_yaml("acme", "#yaml");
        let acme_yml = brand_yaml("acme", "#yml");
        let entries: Vec<(&str, &str)> = vec![
            ("acme.yml", acme_yml.as_str()),
            ("ibm.json", ibm.as_str()),
            ("acme.yaml", acme_yaml.as_str()),
        ];

        let registry = BrandRegistry::from_embedded_entries(&entries).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("acme").unwrap().tokens.dark.get("primary"),
            Some("#yaml")
        );
    }
}
