//! Brand loading with caching and optional remote sources.
//!
//! The [`BrandLoader`] owns the [`BrandRegistry`] and a cache of validated
//! [`Brand`] handles. Lookups are total: an unknown, invalid or unreachable
//! brand is `None`, never an error, so rendering code never has to handle
//! "is this brand available". Only explicit author actions
//! ([`add_brand`](BrandLoader::add_brand),
//! [`try_import_brand_config`](BrandLoader::try_import_brand_config)) report
//! errors.
//!
//! # Cache rules
//!
//! - Entries are created lazily on the first successful load.
//! - A cached entry is returned as-is, without re-validation or re-fetch.
//! - Adding or removing a brand evicts its entry before the call returns, so
//!   the next load observes the mutation.
//!
//! # Sources
//!
//! The source is picked at construction: [`BrandSource::Static`] serves the
//! registry only, [`BrandSource::Remote`] can also fetch brand documents by
//! URL.
//!
//! ```rust
//! use pulse_theme::{BrandConfig, BrandLoader, ThemeMode, TokenSet};
//!
//! let mut loader = BrandLoader::new();
//! loader
//!     .add_brand(
//!         BrandConfig::new("ibm", "IBM", "1.0")
//!             .with_light(TokenSet::new().with("primary", "#0f62fe"))
//!             .with_dark(TokenSet::new().with("primary", "#78a9ff")),
//!     )
//!     .unwrap();
//!
//! let tokens = loader.get_brand_tokens("ibm", ThemeMode::Dark).unwrap();
//! assert_eq!(tokens.get("primary"), Some("#78a9ff"));
//! assert!(loader.load_brand("unknown").is_none());
//! ```

mod error;
mod remote;

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::brand::{
    Brand, BrandConfig, BrandOrigin, BrandParseError, BrandRegistry, TokenSet, ValidationError,
};
use crate::mode::ThemeMode;

pub use error::LoadFailure;
pub use remote::{BrandFetcher, FetchGuard, HttpFetcher, RemoteSource, DEFAULT_FETCH_TIMEOUT};

/// Where a loader may get brands from.
#[derive(Debug, Default)]
pub enum BrandSource {
    /// The in-process registry only.
    #[default]
    Static,
    /// The registry, plus brand documents fetched by URL.
    Remote(RemoteSource),
}

impl BrandSource {
    pub fn supports_remote(&self) -> bool {
        matches!(self, BrandSource::Remote(_))
    }
}

/// Resolves brands by id from a registry, with a cache in front.
#[derive(Debug, Default)]
pub struct BrandLoader {
    registry: BrandRegistry,
    cache: HashMap<String, Brand>,
    source: BrandSource,
    remote_urls: IndexMap<String, String>,
    omitted_in_last_batch: usize,
}

impl BrandLoader {
    /// A static loader over an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A static loader over `registry`.
    pub fn with_registry(registry: BrandRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Replaces the source, returning the loader for chaining.
    pub fn with_source(mut self, source: BrandSource) -> Self {
        self.source = source;
        self
    }

    pub fn registry(&self) -> &BrandRegistry {
        &self.registry
    }

    pub fn source(&self) -> &BrandSource {
        &self.source
    }

    /// Registered ids in insertion order.
    pub fn available_brand_ids(&self) -> Vec<String> {
        self.registry.ids().map(str::to_string).collect()
    }

    /// Whether a validated entry for `id` is currently cached.
    pub fn is_cached(&self, id: &str) -> bool {
        self.cache.contains_key(id)
    }

    /// Registers (or replaces) a brand and evicts its cache entry.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the config id if the config is
    /// invalid; neither the registry nor the cache is touched.
    pub fn add_brand(&mut self, config: BrandConfig) -> Result<(), ValidationError> {
        self.register(config, None)
    }

    /// Removes a brand and its cache entry. Removing an unknown id is a no-op.
    ///
    /// Returns whether the brand was registered.
    pub fn remove_brand(&mut self, id: &str) -> bool {
        self.cache.remove(id);
        self.remote_urls.shift_remove(id);
        let removed = self.registry.remove(id).is_some();
        if removed {
            tracing::info!(brand_id = %id, "removed brand");
        }
        removed
    }

    fn register(&mut self, config: BrandConfig, url: Option<String>) -> Result<(), ValidationError> {
        let id = config.id.clone();
        self.registry.add(config)?;
        self.cache.remove(&id);
        match url {
            Some(url) => {
                tracing::info!(brand_id = %id, url = %url, "registered remote brand");
                self.remote_urls.insert(id, url);
            }
            None => {
                tracing::info!(brand_id = %id, "registered brand");
                self.remote_urls.shift_remove(&id);
            }
        }
        Ok(())
    }

    /// Loads a brand by id, or `None` if it is unknown or invalid.
    pub fn load_brand(&mut self, id: &str) -> Option<Brand> {
        match self.try_load_brand(id) {
            Ok(brand) => Some(brand),
            Err(LoadFailure::NotRegistered(_)) => {
                tracing::debug!(brand_id = %id, "brand not registered");
                None
            }
            Err(e) => {
                tracing::warn!(brand_id = %id, error = %e, "brand failed to load");
                None
            }
        }
    }

    /// Like [`load_brand`](Self::load_brand), reporting why a load failed.
    pub fn try_load_brand(&mut self, id: &str) -> Result<Brand, LoadFailure> {
        if let Some(brand) = self.cache.get(id) {
            tracing::debug!(brand_id = %id, "brand cache hit");
            return Ok(brand.clone());
        }

        let config = self
            .registry
            .get(id)
            .ok_or_else(|| LoadFailure::NotRegistered(id.to_string()))?;
        config.validate()?;

        let origin = match self.remote_urls.get(id) {
            Some(url) => BrandOrigin::Remote { url: url.clone() },
            None => BrandOrigin::Registry,
        };
        let brand = Brand::new(config.clone(), origin);
        tracing::debug!(brand_id = %id, "brand cache miss, cached");
        self.cache.insert(id.to_string(), brand.clone());
        Ok(brand)
    }

    /// Loads every registered brand in registry order.
    ///
    /// A brand that fails to load is left out of the result and counted in
    /// [`omitted_in_last_batch`](Self::omitted_in_last_batch). Registration
    /// validates every config, so with the current rules nothing is left out
    /// and the count stays 0.
    pub fn load_all_brands(&mut self) -> Vec<Brand> {
        let ids = self.available_brand_ids();
        let total = ids.len();
        let brands: Vec<Brand> = ids.iter().filter_map(|id| self.load_brand(id)).collect();

        self.omitted_in_last_batch = total - brands.len();
        tracing::debug!(
            loaded = brands.len(),
            omitted = self.omitted_in_last_batch,
            "batch load finished"
        );
        brands
    }

    /// How many brands the last [`load_all_brands`](Self::load_all_brands)
    /// left out. Each omission was already logged by
    /// [`load_brand`](Self::load_brand).
    pub fn omitted_in_last_batch(&self) -> usize {
        self.omitted_in_last_batch
    }

    /// The token set of `id` for `mode`, or `None` if the brand is unavailable.
    pub fn get_brand_tokens(&mut self, id: &str, mode: ThemeMode) -> Option<TokenSet> {
        self.load_brand(id).map(|brand| brand.tokens(mode).clone())
    }

    /// Serializes the registered config of `id` as JSON.
    pub fn export_brand_config(&self, id: &str) -> Option<String> {
        let config = self.registry.get(id)?;
        match config.to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::warn!(brand_id = %id, error = %e, "failed to export brand");
                None
            }
        }
    }

    /// Parses, validates and registers a JSON brand document.
    ///
    /// Returns `false` on any parse or validation failure, leaving the
    /// registry untouched.
    pub fn import_brand_config(&mut self, json: &str) -> bool {
        match self.try_import_brand_config(json) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "brand import rejected");
                false
            }
        }
    }

    /// Like [`import_brand_config`](Self::import_brand_config), returning the
    /// imported id or the reason the document was rejected.
    pub fn try_import_brand_config(&mut self, json: &str) -> Result<String, BrandParseError> {
        let config = BrandConfig::from_json(json)?;
        let id = config.id.clone();
        self.register(config, None)?;
        Ok(id)
    }

    /// The URL a remote brand was fetched from.
    pub fn brand_url(&self, id: &str) -> Option<&str> {
        self.remote_urls.get(id).map(String::as_str)
    }

    /// Fetches a brand document, registers it and returns the loaded brand.
    ///
    /// Every failure (remote loading disabled, network error, non-success
    /// status, timeout, malformed JSON, failed validation, id mismatch) is
    /// logged and collapses to `None`; the registry is left unchanged.
    pub async fn load_brand_from_url(&mut self, id: &str, url: &str) -> Option<Brand> {
        match self.try_load_brand_from_url(id, url).await {
            Ok(brand) => Some(brand),
            Err(e) => {
                tracing::warn!(brand_id = %id, url = %url, error = %e, "remote brand failed to load");
                None
            }
        }
    }

    /// Like [`load_brand_from_url`](Self::load_brand_from_url), reporting why
    /// the load failed.
    pub async fn try_load_brand_from_url(&mut self, id: &str, url: &str) -> Result<Brand, LoadFailure> {
        let BrandSource::Remote(remote) = &self.source else {
            return Err(LoadFailure::RemoteDisabled);
        };

        let body = remote.fetch(url).await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| LoadFailure::Malformed {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let config = BrandConfig::from_value(value)?;
        if config.id != id {
            return Err(LoadFailure::IdMismatch {
                url: url.to_string(),
                expected: id.to_string(),
                found: config.id,
            });
        }

        self.register(config, Some(url.to_string()))?;
        self.try_load_brand(id)
    }

    /// Re-fetches a remote brand from the URL it was loaded from.
    pub async fn refresh_remote_brand(&mut self, id: &str) -> Option<Brand> {
        let Some(url) = self.brand_url(id).map(str::to_string) else {
            tracing::warn!(error = %LoadFailure::UnknownUrl(id.to_string()), "cannot refresh brand");
            return None;
        };
        self.load_brand_from_url(id, &url).await
    }
}
