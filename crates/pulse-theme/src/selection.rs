//! Requested and active brand/mode selections.

use crate::brand::TokenSet;
use crate::mode::ThemeMode;
use crate::resolve::{Fallback, Resolution};

/// A brand and mode choice, as requested by the user or stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    /// `None` selects the built-in default brand.
    pub brand_id: Option<String>,
    pub mode: ThemeMode,
}

impl Selection {
    pub fn new(brand_id: Option<&str>, mode: ThemeMode) -> Self {
        Self {
            brand_id: brand_id.map(str::to_string),
            mode,
        }
    }

    /// The built-in default brand in `mode`.
    pub fn unbranded(mode: ThemeMode) -> Self {
        Self::new(None, mode)
    }
}

/// The selection currently applied to the running application.
///
/// Only the engine creates and replaces it. `brand_id` always names a brand
/// that resolved successfully; a brand that could not be loaded leaves it
/// `None` and records the [`Fallback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSelection {
    pub brand_id: Option<String>,
    pub mode: ThemeMode,
    pub tokens: TokenSet,
    pub fallback: Option<Fallback>,
}

impl ActiveSelection {
    /// Reads a resolved token, `""` when it is not defined.
    pub fn token(&self, name: &str) -> &str {
        self.tokens.value_or_empty(name)
    }

    /// The effective selection, without the resolved tokens.
    pub fn selection(&self) -> Selection {
        Selection {
            brand_id: self.brand_id.clone(),
            mode: self.mode,
        }
    }
}

impl From<Resolution> for ActiveSelection {
    fn from(resolution: Resolution) -> Self {
        Self {
            brand_id: resolution.brand_id,
            mode: resolution.mode,
            tokens: resolution.tokens,
            fallback: resolution.fallback,
        }
    }
}
