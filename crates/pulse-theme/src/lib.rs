//! # Pulse Theme - Brand and Theme-Mode Token Resolution
//!
//! Pulse Theme turns a (brand, mode) choice into the concrete design tokens
//! (colors, spacing, typography, radii, shadows, breakpoints) a UI renders
//! with. It provides:
//!
//! - **Brand configs** with one token set per mode, authored in code, JSON or YAML
//! - **A validating registry** and a **caching loader**, optionally fetching brands by URL
//! - **Total resolution**: an unknown or broken brand renders with the defaults
//! - **Persistence** of the last choice that tolerates any storage failure
//! - **Publication** of the active selection to environment attributes and listeners
//!
//! ## Core Concepts
//!
//! - [`BrandConfig`]: id, name, version and light/dark [`TokenSet`]s
//! - [`BrandLoader`]: registry plus cache, with a [`BrandSource`] picked at construction
//! - [`ResolutionPolicy`]: brand id + [`ThemeMode`] to a [`Resolution`]
//! - [`PreferenceAdapter`]: reads/writes the [`Selection`] through a [`PreferenceStore`]
//! - [`ThemeEngine`]: owns all of the above and the [`ActiveSelection`]
//!
//! ## Quick Start
//!
//! ```rust
//! use pulse_theme::{BrandConfig, ThemeEngine, ThemeMode, TokenSet};
//!
//! let mut engine = ThemeEngine::builder()
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
//!
//! engine.set_brand(Some("ibm"));
//! assert_eq!(engine.active_token_value("primary"), "#0f62fe");
//!
//! // Unknown brands fall back to the built-in defaults.
//! engine.set_brand(Some("acme"));
//! assert_eq!(engine.active().brand_id, None);
//! assert!(engine.active().fallback.is_some());
//! ```
//!
//! ## Brand Files
//!
//! ```yaml
//! id: ibm
//! name: IBM
//! version: "1.0"
//! figmaFileKey: abc123
//! tokens:
//!   light:
//!     primary: "#0f62fe"
//!   dark:
//!     primary: "#78a9ff"
//! ```
//!
//! Register a directory of such files with [`BrandRegistry::add_dir`] or
//! [`EngineConfig::brand_dirs`].

pub mod apply;
pub mod brand;
pub mod config;
pub mod engine;
pub mod loader;
pub mod mode;
pub mod persist;
pub mod prelude;
pub mod resolve;
pub mod selection;

pub use apply::{AttributeNames, Environment, Listener, RootAttributes, Subscription};
pub use brand::{
    is_valid, validate_value, Brand, BrandConfig, BrandOrigin, BrandParseError, BrandRegistry,
    BrandTokens, RegistryError, TokenSet, ValidationError, ValidationIssue, BRAND_EXTENSIONS,
    NO_BRAND_ID,
};
pub use config::{ConfigError, EngineConfig};
pub use engine::{EngineError, ThemeEngine, ThemeEngineBuilder};
pub use loader::{
    BrandFetcher, BrandLoader, BrandSource, FetchGuard, HttpFetcher, LoadFailure, RemoteSource,
    DEFAULT_FETCH_TIMEOUT,
};
pub use mode::{detect_theme_mode, set_mode_detector, ParseModeError, ThemeMode};
pub use persist::{
    FileStore, MemoryStore, PreferenceAdapter, PreferenceStore, StorageKeys, StoreError,
    UnavailableStore,
};
pub use resolve::{default_tokens, Fallback, Resolution, ResolutionPolicy};
pub use selection::{ActiveSelection, Selection};
