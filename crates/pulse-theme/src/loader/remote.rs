//! Remote brand documents.
//!
//! A [`RemoteSource`] pairs a [`BrandFetcher`] with a timeout. The fetcher
//! only moves bytes; parsing, validation and registration stay in the
//! loader so every source goes through the same checks.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::error::LoadFailure;

/// Default bound on a single brand fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the text of a brand document.
#[async_trait]
pub trait BrandFetcher: Send + Sync {
    /// Returns the body of `url`, or why it could not be read.
    ///
    /// Non-success statuses must be reported as [`LoadFailure::Status`].
    async fn fetch(&self, url: &str) -> Result<String, LoadFailure>;
}

/// HTTP fetcher backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    /// Wraps an existing client. `timeout` is only used for error reports.
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl BrandFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, LoadFailure> {
        let network = |e: reqwest::Error| {
            if e.is_timeout() {
                LoadFailure::Timeout {
                    url: url.to_string(),
                    timeout: self.timeout,
                }
            } else {
                LoadFailure::Network {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let response = self.client.get(url).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadFailure::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(network)
    }
}

/// A fetcher plus the bound applied to each fetch.
pub struct RemoteSource {
    fetcher: Box<dyn BrandFetcher>,
    timeout: Duration,
}

impl RemoteSource {
    pub fn new(fetcher: impl BrandFetcher + 'static, timeout: Duration) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            timeout,
        }
    }

    /// An HTTP source with the given timeout.
    pub fn http(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::new(HttpFetcher::new(timeout)?, timeout))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) async fn fetch(&self, url: &str) -> Result<String, LoadFailure> {
        match tokio::time::timeout(self.timeout, self.fetcher.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(LoadFailure::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }),
        }
    }
}

impl fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSource")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// A "still relevant" flag for an in-flight remote load.
///
/// The caller keeps a clone and calls [`cancel`](FetchGuard::cancel) when it
/// goes away (a dialog closes, a view is torn down). A cancelled guard stops
/// the fetched brand from being applied; registration still happens.
#[derive(Debug, Clone)]
pub struct FetchGuard {
    live: Arc<AtomicBool>,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn cancel(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

impl Default for FetchGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowFetcher;

    #[async_trait]
    impl BrandFetcher for SlowFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, LoadFailure> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("{}".to_string())
        }
    }

    #[tokio::test]
    async fn test_remote_source_times_out() {
        let source = RemoteSource::new(SlowFetcher, Duration::from_millis(20));
        let err = source.fetch("https://slow.example/brand.json").await.unwrap_err();
        assert!(matches!(err, LoadFailure::Timeout { .. }));
    }

    #[test]
    fn test_fetch_guard_cancel_is_shared() {
        let guard = FetchGuard::new();
        let held_by_task = guard.clone();
        assert!(held_by_task.is_live());

        guard.cancel();
        assert!(!held_by_task.is_live());
    }
}
