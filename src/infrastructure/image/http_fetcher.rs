//! HTTP image fetcher backed by `reqwest`.

use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::domain::entities::Locator;
use crate::domain::errors::{LoadError, LoadResult};
use crate::domain::ports::ImageFetcherPort;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Downloads image payloads over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher with the given request timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> LoadResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LoadError::client(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ImageFetcherPort for HttpImageFetcher {
    async fn fetch(&self, locator: &Locator) -> LoadResult<Bytes> {
        debug!(locator = %locator, "Downloading image");

        let response = self
            .client
            .get(locator.url().clone())
            .send()
            .await
            .map_err(|e| LoadError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LoadError::transport(format!("failed to read body: {e}")))?;

        trace!(locator = %locator, len = bytes.len(), "Downloaded image payload");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        assert!(HttpImageFetcher::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS)).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let fetcher = HttpImageFetcher::new(Duration::from_secs(2)).unwrap();
        // Port 9 on loopback is discard; nothing listens there in test environments.
        let locator = Locator::parse("http://127.0.0.1:9/a.png").unwrap();

        let err = fetcher.fetch(&locator).await.unwrap_err();
        assert!(err.is_transport());
    }
}
