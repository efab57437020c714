//! Brands: configs, token sets, validation and the registry.
//!
//! A brand is a named, versioned design identity that supplies one
//! [`TokenSet`] per [`ThemeMode`](crate::ThemeMode). Configs are authored in
//! code, in JSON/YAML files, or fetched remotely; all of them are validated
//! by the same rules before they reach the [`BrandRegistry`].

mod config;
mod error;
mod registry;
mod tokens;

pub use config::{
    is_valid, validate_value, Brand, BrandConfig, BrandOrigin, BrandTokens, BRAND_EXTENSIONS,
    NO_BRAND_ID,
};
pub use error::{BrandParseError, RegistryError, ValidationError, ValidationIssue};
pub use registry::BrandRegistry;
pub use tokens::TokenSet;
