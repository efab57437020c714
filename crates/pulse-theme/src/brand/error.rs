//! Brand validation and loading errors.

use std::fmt;
use std::path::PathBuf;

use crate::mode::ThemeMode;

/// A single structural problem found in a brand document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The document is not an object.
    NotAnObject,
    /// A required field is absent (or null).
    MissingField(&'static str),
    /// A field that must be a string has another type.
    NotAString(&'static str),
    /// A required string field is empty.
    EmptyField(&'static str),
    /// A field that must be a mapping is a primitive or an array.
    NotAMapping(String),
    /// A token value is not a string, number or boolean.
    InvalidTokenValue { mode: ThemeMode, name: String },
    /// The id collides with the reserved "no brand" literal.
    ReservedId(String),
    /// The document passed the structural checks but could not be decoded.
    Malformed(String),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NotAnObject => write!(f, "document is not an object"),
            ValidationIssue::MissingField(field) => write!(f, "missing field '{}'", field),
            ValidationIssue::NotAString(field) => write!(f, "field '{}' must be a string", field),
            ValidationIssue::EmptyField(field) => write!(f, "field '{}' is empty", field),
            ValidationIssue::NotAMapping(field) => {
                write!(f, "field '{}' must be a mapping", field)
            }
            ValidationIssue::InvalidTokenValue { mode, name } => write!(
                f,
                "token '{}' in '{}' must be a string, number or boolean",
                name, mode
            ),
            ValidationIssue::ReservedId(id) => {
                write!(f, "id '{}' is reserved for the built-in default", id)
            }
            ValidationIssue::Malformed(message) => write!(f, "{}", message),
        }
    }
}

/// A brand config failed structural validation.
///
/// Carries the offending id (or `<unknown>` when the document has none) and
/// every issue found, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid brand config '{id}': {}", join_issues(.issues))]
pub struct ValidationError {
    pub id: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(id: impl Into<String>, issues: Vec<ValidationIssue>) -> Self {
        Self {
            id: id.into(),
            issues,
        }
    }

    pub fn has_issue(&self, issue: &ValidationIssue) -> bool {
        self.issues.contains(issue)
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A brand document could not be turned into a [`BrandConfig`](super::BrandConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrandParseError {
    /// The text is not valid JSON/YAML.
    #[error("malformed brand document: {0}")]
    Syntax(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Error raised while registering brands from files.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to load brand file {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },

    #[error("brand directory {} is not readable: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
