//! Common imports for applications embedding the engine.
//!
//! ```rust
//! use pulse_theme::prelude::*;
//!
//! let mut engine = ThemeEngine::builder()
//!     .default_mode(ThemeMode::Dark)
//!     .build()
//!     .unwrap();
//! engine.start();
//! assert_eq!(engine.active().mode, ThemeMode::Dark);
//! ```

pub use crate::apply::{Environment, RootAttributes, Subscription};
pub use crate::brand::{BrandConfig, TokenSet};
pub use crate::config::EngineConfig;
pub use crate::engine::ThemeEngine;
pub use crate::mode::ThemeMode;
pub use crate::selection::{ActiveSelection, Selection};
