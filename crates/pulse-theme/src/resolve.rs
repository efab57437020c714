//! Turning a (brand, mode) request into a concrete token set.
//!
//! Resolution is total: every request yields a [`TokenSet`]. When no brand is
//! requested, or the requested brand cannot be loaded, the built-in PulseUI
//! defaults for the mode are used and the fallback is reported.
//!
//! By default a brand's token set is used wholesale. A brand that leaves a key
//! out simply does not define it. [`ResolutionPolicy::inherit_defaults`]
//! switches to filling unset keys from the defaults instead.

use once_cell::sync::Lazy;

use crate::brand::{BrandTokens, TokenSet};
use crate::loader::BrandLoader;
use crate::mode::ThemeMode;

static PULSEUI_DEFAULTS: Lazy<BrandTokens> = Lazy::new(|| {
    let shared = [
        ("spacing.xs", "4px"),
        ("spacing.sm", "8px"),
        ("spacing.md", "16px"),
        ("spacing.lg", "24px"),
        ("spacing.xl", "32px"),
        ("radius.sm", "4px"),
        ("radius.md", "8px"),
        ("radius.full", "9999px"),
        ("font.family", "Inter, system-ui, sans-serif"),
        ("font.size.sm", "0.875rem"),
        ("font.size.md", "1rem"),
        ("font.size.lg", "1.25rem"),
        ("font.weight.regular", "400"),
        ("font.weight.bold", "600"),
        ("breakpoint.sm", "640px"),
        ("breakpoint.md", "768px"),
        ("breakpoint.lg", "1024px"),
    ];
    let light = [
        ("primary", "#2563eb"),
        ("primary.foreground", "#ffffff"),
        ("background", "#ffffff"),
        ("foreground", "#0f172a"),
        ("muted", "#f1f5f9"),
        ("muted.foreground", "#64748b"),
        ("border", "#e2e8f0"),
        ("destructive", "#dc2626"),
        ("shadow.md", "0 4px 6px -1px rgb(0 0 0 / 0.1)"),
    ];
    let dark = [
        ("primary", "#3b82f6"),
        ("primary.foreground", "#0f172a"),
        ("background", "#0f172a"),
        ("foreground", "#f8fafc"),
        ("muted", "#1e293b"),
        ("muted.foreground", "#94a3b8"),
        ("border", "#334155"),
        ("destructive", "#ef4444"),
        ("shadow.md", "0 4px 6px -1px rgb(0 0 0 / 0.4)"),
    ];

    BrandTokens::new(
        light.into_iter().chain(shared).collect(),
        dark.into_iter().chain(shared).collect(),
    )
});

/// The built-in PulseUI token sets used when no brand applies.
pub fn default_tokens() -> &'static BrandTokens {
    &PULSEUI_DEFAULTS
}

/// Why resolution did not use the requested brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// The brand is unknown or failed to load.
    BrandUnavailable(String),
}

/// The outcome of resolving a (brand, mode) request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The effective brand; `None` when the defaults were used.
    pub brand_id: Option<String>,
    pub mode: ThemeMode,
    pub tokens: TokenSet,
    /// Set when a requested brand could not be used.
    pub fallback: Option<Fallback>,
}

impl Resolution {
    pub fn fell_back(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Selects the active token set from a brand id and mode.
#[derive(Debug, Clone)]
pub struct ResolutionPolicy {
    defaults: BrandTokens,
    inherit_defaults: bool,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            defaults: default_tokens().clone(),
            inherit_defaults: false,
        }
    }
}

impl ResolutionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the built-in defaults.
    pub fn with_defaults(mut self, defaults: BrandTokens) -> Self {
        self.defaults = defaults;
        self
    }

    /// Fill keys a brand leaves unset from the defaults.
    pub fn inherit_defaults(mut self, inherit: bool) -> Self {
        self.inherit_defaults = inherit;
        self
    }

    pub fn defaults(&self) -> &BrandTokens {
        &self.defaults
    }

    /// Resolves `brand_id` and `mode` against the loader's current state.
    ///
    /// Same inputs give the same output as long as the registry does not
    /// change in between.
    pub fn resolve(
        &self,
        loader: &mut BrandLoader,
        brand_id: Option<&str>,
        mode: ThemeMode,
    ) -> Resolution {
        let default_set = self.defaults.for_mode(mode);

        let Some(requested) = brand_id else {
            return Resolution {
                brand_id: None,
                mode,
                tokens: default_set.clone(),
                fallback: None,
            };
        };

        match loader.load_brand(requested) {
            Some(brand) => {
                let brand_set = brand.tokens(mode);
                let tokens = if self.inherit_defaults {
                    brand_set.inherit_from(default_set)
                } else {
                    brand_set.clone()
                };
                Resolution {
                    brand_id: Some(requested.to_string()),
                    mode,
                    tokens,
                    fallback: None,
                }
            }
            None => {
                tracing::debug!(brand_id = %requested, mode = %mode, "brand unavailable, using defaults");
                Resolution {
                    brand_id: None,
                    mode,
                    tokens: default_set.clone(),
                    fallback: Some(Fallback::BrandUnavailable(requested.to_string())),
                }
            }
        }
    }
}
