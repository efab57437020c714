//! Engine configuration.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```yaml
//! storage:
//!   brand: app-brand
//!   mode: app-theme
//! attributes:
//!   brand: data-brand
//!   mode: data-theme
//! fetch_timeout_secs: 5
//! default_mode: dark
//! inherit_defaults: true
//! brand_dirs:
//!   - ./brands
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::apply::AttributeNames;
use crate::mode::ThemeMode;
use crate::persist::StorageKeys;

/// Error loading an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config{}: {message}", located(.path))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },
}

fn located(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

/// Settings for a [`ThemeEngine`](crate::ThemeEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub storage: StorageKeys,
    pub attributes: AttributeNames,
    pub fetch_timeout_secs: u64,
    /// Mode used when nothing is persisted. `None` asks the OS.
    pub default_mode: Option<ThemeMode>,
    /// Fill keys a brand leaves unset from the built-in defaults.
    pub inherit_defaults: bool,
    /// Directories of brand files registered when the engine is built.
    pub brand_dirs: Vec<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage: StorageKeys::default(),
            attributes: AttributeNames::default(),
            fetch_timeout_secs: 10,
            default_mode: None,
            inherit_defaults: false,
            brand_dirs: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
