use std::time::Duration;

use crate::brand::ValidationError;

/// Why a brand could not be loaded.
///
/// Load failures are expected outcomes (a brand was deleted, a server is
/// down), so the `load_*` methods collapse them to `None` and log the cause.
/// The `try_load_*` variants return them for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadFailure {
    #[error("brand '{0}' is not registered")]
    NotRegistered(String),

    #[error("remote brand loading is not enabled for this loader")]
    RemoteDisabled,

    #[error("no remote url is known for brand '{0}'")]
    UnknownUrl(String),

    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("fetching {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("malformed brand document from {url}: {message}")]
    Malformed { url: String, message: String },

    #[error("document at {url} declares id '{found}', expected '{expected}'")]
    IdMismatch {
        url: String,
        expected: String,
        found: String,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
