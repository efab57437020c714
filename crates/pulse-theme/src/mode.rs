//! Theme mode and OS preference detection.
//!
//! A [`ThemeMode`] is orthogonal to the brand: every brand supplies one token
//! set per mode, and exactly one mode is active at a time.
//!
//! # Detection
//!
//! When the user has no stored preference, the engine starts in the mode the
//! OS reports. [`detect_theme_mode`] queries the OS through `dark-light`;
//! override it for testing with [`set_mode_detector`]:
//!
//! ```rust
//! use pulse_theme::{detect_theme_mode, set_mode_detector, ThemeMode};
//!
//! set_mode_detector(|| ThemeMode::Dark);
//! assert_eq!(detect_theme_mode(), ThemeMode::Dark);
//! # set_mode_detector(|| ThemeMode::Light);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use dark_light::Mode as OsMode;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Light or dark variant of a brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light background, dark text.
    #[default]
    Light,
    /// Dark background, light text.
    Dark,
}

impl ThemeMode {
    /// Both modes, in declaration order.
    pub const ALL: [ThemeMode; 2] = [ThemeMode::Light, ThemeMode::Dark];

    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// The name used in stored preferences and environment attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is neither `"light"` nor `"dark"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme mode '{0}' (expected 'light' or 'dark')")]
pub struct ParseModeError(pub String);

impl FromStr for ThemeMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

type ModeDetector = fn() -> ThemeMode;

static MODE_DETECTOR: Lazy<Mutex<ModeDetector>> = Lazy::new(|| Mutex::new(os_mode_detector));

/// Overrides the detector used to decide the initial mode.
///
/// The override is process-wide. Tests that install one should restore a
/// known detector when they finish.
pub fn set_mode_detector(detector: ModeDetector) {
    let mut guard = MODE_DETECTOR.lock().unwrap_or_else(|e| e.into_inner());
    *guard = detector;
}

/// Detects the user's preferred mode.
///
/// Returns [`ThemeMode::Light`] when the OS does not express a preference.
pub fn detect_theme_mode() -> ThemeMode {
    let detector = MODE_DETECTOR.lock().unwrap_or_else(|e| e.into_inner());
    (*detector)()
}

fn os_mode_detector() -> ThemeMode {
    match dark_light::detect() {
        Ok(OsMode::Dark) => ThemeMode::Dark,
        Ok(OsMode::Light) | Ok(OsMode::Unspecified) => ThemeMode::Light,
        Err(e) => {
            tracing::debug!(error = %e, "OS color scheme detection failed, using light");
            ThemeMode::Light
        }
    }
}
