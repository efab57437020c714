//! The theme engine: one instance owns the registry, cache and active
//! selection.
//!
//! # Lifecycle
//!
//! ```rust
//! use pulse_theme::{BrandConfig, MemoryStore, RootAttributes, ThemeEngine, ThemeMode, TokenSet};
//!
//! let root = RootAttributes::new();
//! let mut engine = ThemeEngine::builder()
//!     .store(MemoryStore::new())
//!     .environment(root.clone())
//!     .default_mode(ThemeMode::Light)
//!     .build()
//!     .unwrap();
//! engine.start();
//!
//! engine
//!     .add_brand(
//!         BrandConfig::new("ibm", "IBM", "1.0")
//!             .with_light(TokenSet::new().with("primary", "#0f62fe"))
//!             .with_dark(TokenSet::new().with("primary", "#78a9ff")),
//!     )
//!     .unwrap();
//! engine.set_brand(Some("ibm"));
//! engine.toggle_mode();
//!
//! assert_eq!(engine.active_token_value("primary"), "#78a9ff");
//! assert_eq!(root.attribute("data-brand").as_deref(), Some("ibm"));
//! assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));
//! ```
//!
//! Every operation except the remote loads runs to completion on the calling
//! thread, and listeners have been notified by the time it returns. Remote
//! loads hold `&mut self` across the fetch, so no other engine operation can
//! interleave with them. Hosts that share an engine between threads wrap it
//! in a single `Mutex`.

use crate::apply::{AttributeNames, Environment, ListenerList, RootAttributes, Subscription};
use crate::brand::{
    Brand, BrandConfig, BrandParseError, BrandRegistry, BrandTokens, RegistryError, ValidationError,
};
use crate::config::EngineConfig;
use crate::loader::{BrandLoader, BrandSource, FetchGuard, RemoteSource};
use crate::mode::{detect_theme_mode, ThemeMode};
use crate::persist::{MemoryStore, PreferenceAdapter, PreferenceStore};
use crate::resolve::{Fallback, ResolutionPolicy};
use crate::selection::{ActiveSelection, Selection};

/// Error building a [`ThemeEngine`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Builder for [`ThemeEngine`].
#[derive(Default)]
pub struct ThemeEngineBuilder {
    config: EngineConfig,
    loader: Option<BrandLoader>,
    source: Option<BrandSource>,
    remote_http: bool,
    store: Option<Box<dyn PreferenceStore>>,
    environment: Option<Box<dyn Environment>>,
    default_mode: Option<ThemeMode>,
    defaults: Option<BrandTokens>,
}

impl ThemeEngineBuilder {
    /// Replaces the engine settings. A mode set with
    /// [`default_mode`](Self::default_mode) wins over the config's, whatever
    /// the call order.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses an existing loader instead of an empty one.
    ///
    /// The loader keeps its own source, so [`source`](Self::source) and
    /// [`remote_http`](Self::remote_http) have no effect alongside it.
    pub fn loader(mut self, loader: BrandLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Source of a loader created by the builder.
    pub fn source(mut self, source: BrandSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Enables loading brands over HTTP, bounded by the configured timeout.
    pub fn remote_http(mut self) -> Self {
        self.remote_http = true;
        self
    }

    /// Where the preference is persisted. Defaults to an in-memory store.
    pub fn store(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Where selections are published. Defaults to a private [`RootAttributes`].
    pub fn environment(mut self, environment: impl Environment + 'static) -> Self {
        self.environment = Some(Box::new(environment));
        self
    }

    /// Mode used when nothing is stored, overriding the config's.
    pub fn default_mode(mut self, mode: ThemeMode) -> Self {
        self.default_mode = Some(mode);
        self
    }

    /// Replaces the built-in default token sets.
    pub fn defaults(mut self, defaults: BrandTokens) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Builds the engine and registers the configured brand directories.
    ///
    /// The engine starts out unbranded and unapplied; call
    /// [`ThemeEngine::start`] to restore the stored preference.
    pub fn build(self) -> Result<ThemeEngine, EngineError> {
        let mut loader = match self.loader {
            Some(loader) => {
                if self.source.is_some() || self.remote_http {
                    tracing::warn!("a loader was given, ignoring the builder's brand source");
                }
                loader
            }
            None => {
                let source = match self.source {
                    Some(source) => source,
                    None if self.remote_http => {
                        BrandSource::Remote(RemoteSource::http(self.config.fetch_timeout())?)
                    }
                    None => BrandSource::Static,
                };
                BrandLoader::new().with_source(source)
            }
        };

        for dir in &self.config.brand_dirs {
            let mut registry = BrandRegistry::new();
            registry.add_dir(dir)?;
            for config in registry.iter() {
                loader.add_brand(config.clone()).map_err(RegistryError::from)?;
            }
        }

        let mut policy = ResolutionPolicy::new().inherit_defaults(self.config.inherit_defaults);
        if let Some(defaults) = self.defaults {
            policy = policy.with_defaults(defaults);
        }

        let store = self.store.unwrap_or_else(|| Box::new(MemoryStore::new()));
        let environment = self
            .environment
            .unwrap_or_else(|| Box::new(RootAttributes::new()));
        let default_mode = self.default_mode.or(self.config.default_mode);
        let mode = default_mode.unwrap_or_default();
        let active = ActiveSelection::from(policy.resolve(&mut loader, None, mode));

        Ok(ThemeEngine {
            loader,
            policy,
            preferences: PreferenceAdapter::with_keys(store, self.config.storage.clone()),
            environment,
            attributes: self.config.attributes.clone(),
            default_mode,
            active,
            listeners: ListenerList::default(),
        })
    }
}

/// Owns brands, the active selection and its publication.
pub struct ThemeEngine {
    loader: BrandLoader,
    policy: ResolutionPolicy,
    preferences: PreferenceAdapter,
    environment: Box<dyn Environment>,
    attributes: AttributeNames,
    default_mode: Option<ThemeMode>,
    active: ActiveSelection,
    listeners: ListenerList,
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("loader", &self.loader)
            .field("preferences", &self.preferences)
            .field("attributes", &self.attributes)
            .field("active", &self.active)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl ThemeEngine {
    pub fn builder() -> ThemeEngineBuilder {
        ThemeEngineBuilder::default()
    }

    /// Restores the stored preference and applies it.
    ///
    /// Missing or unreadable entries fall back to no brand and the configured
    /// default mode, or the OS mode when none is configured.
    pub fn start(&mut self) -> &ActiveSelection {
        let defaults = Selection::unbranded(self.default_mode.unwrap_or_else(detect_theme_mode));
        let preference = self.preferences.read_preference(&defaults);
        tracing::debug!(
            brand_id = ?preference.brand_id,
            mode = %preference.mode,
            "restoring stored selection"
        );
        self.apply_selection(preference)
    }

    /// Resolves and publishes a selection.
    ///
    /// Writes the environment attributes and tokens, replaces the active
    /// selection, persists it and notifies listeners, in that order. The
    /// persisted value is the effective selection: a brand that could not be
    /// loaded is stored as "no brand".
    pub fn apply_selection(&mut self, selection: Selection) -> &ActiveSelection {
        let resolution =
            self.policy
                .resolve(&mut self.loader, selection.brand_id.as_deref(), selection.mode);
        if let Some(Fallback::BrandUnavailable(id)) = &resolution.fallback {
            tracing::warn!(brand_id = %id, mode = %resolution.mode, "brand unavailable, applying defaults");
        }
        let active = ActiveSelection::from(resolution);

        match &active.brand_id {
            Some(id) => self.environment.set_attribute(&self.attributes.brand, id),
            None => self.environment.remove_attribute(&self.attributes.brand),
        }
        self.environment
            .set_attribute(&self.attributes.mode, active.mode.as_str());
        self.environment.write_tokens(&active.tokens);

        self.active = active;
        self.preferences.write_preference(&self.active.selection());
        tracing::debug!(
            brand_id = ?self.active.brand_id,
            mode = %self.active.mode,
            tokens = self.active.tokens.len(),
            "applied selection"
        );

        self.listeners.notify(&self.active);
        &self.active
    }

    /// Flips light and dark, keeping the brand.
    pub fn toggle_mode(&mut self) -> &ActiveSelection {
        let mode = self.active.mode.toggled();
        self.set_mode(mode)
    }

    pub fn set_mode(&mut self, mode: ThemeMode) -> &ActiveSelection {
        let brand_id = self.active.brand_id.clone();
        self.apply_selection(Selection { brand_id, mode })
    }

    /// Selects a brand (`None` for the built-in defaults), keeping the mode.
    pub fn set_brand(&mut self, brand_id: Option<&str>) -> &ActiveSelection {
        let mode = self.active.mode;
        self.apply_selection(Selection::new(brand_id, mode))
    }

    pub fn active(&self) -> &ActiveSelection {
        &self.active
    }

    /// A resolved token of the active selection, `""` when not defined.
    pub fn active_token_value(&self, name: &str) -> &str {
        self.active.token(name)
    }

    /// Registers a listener called after every applied selection.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ActiveSelection) + Send + Sync + 'static,
    {
        self.listeners.add(std::sync::Arc::new(listener))
    }

    pub fn loader(&self) -> &BrandLoader {
        &self.loader
    }

    pub fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    pub fn available_brand_ids(&self) -> Vec<String> {
        self.loader.available_brand_ids()
    }

    /// Registers (or replaces) a brand. Replacing the active brand re-applies
    /// it so its new tokens are published.
    pub fn add_brand(&mut self, config: BrandConfig) -> Result<(), ValidationError> {
        let id = config.id.clone();
        self.loader.add_brand(config)?;
        self.reapply_if_active(&id);
        Ok(())
    }

    /// Removes a brand. Removing the active brand falls back to the defaults.
    pub fn remove_brand(&mut self, id: &str) -> bool {
        let removed = self.loader.remove_brand(id);
        self.reapply_if_active(id);
        removed
    }

    pub fn export_brand_config(&self, id: &str) -> Option<String> {
        self.loader.export_brand_config(id)
    }

    /// Imports a JSON brand document; `false` if it was rejected.
    pub fn import_brand_config(&mut self, json: &str) -> bool {
        match self.try_import_brand_config(json) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "brand import rejected");
                false
            }
        }
    }

    pub fn try_import_brand_config(&mut self, json: &str) -> Result<String, BrandParseError> {
        let id = self.loader.try_import_brand_config(json)?;
        self.reapply_if_active(&id);
        Ok(id)
    }

    /// Fetches and registers a remote brand without selecting it.
    pub async fn load_brand_from_url(&mut self, id: &str, url: &str) -> Option<Brand> {
        let brand = self.loader.load_brand_from_url(id, url).await?;
        self.reapply_if_active(id);
        Some(brand)
    }

    /// Re-fetches a remote brand from the URL it was loaded from.
    pub async fn refresh_remote_brand(&mut self, id: &str) -> Option<Brand> {
        let brand = self.loader.refresh_remote_brand(id).await?;
        self.reapply_if_active(id);
        Some(brand)
    }

    /// Fetches a remote brand and selects it, unless `guard` was cancelled
    /// while the fetch was in flight.
    ///
    /// Returns whether the brand was applied. A cancelled load still
    /// registers the brand.
    pub async fn load_and_apply_from_url(&mut self, id: &str, url: &str, guard: &FetchGuard) -> bool {
        if self.loader.load_brand_from_url(id, url).await.is_none() {
            return false;
        }
        if !guard.is_live() {
            tracing::debug!(brand_id = %id, url = %url, "remote load no longer relevant, not applying");
            self.reapply_if_active(id);
            return false;
        }
        self.set_brand(Some(id));
        true
    }

    fn reapply_if_active(&mut self, id: &str) {
        if self.active.brand_id.as_deref() == Some(id) {
            tracing::debug!(brand_id = %id, "active brand changed, re-applying");
            let selection = self.active.selection();
            self.apply_selection(selection);
        }
    }
}
