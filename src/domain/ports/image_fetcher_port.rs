//! Port definition for downloading image payloads.

use bytes::Bytes;

use crate::domain::entities::Locator;
use crate::domain::errors::LoadResult;

/// Port for fetching raw image bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageFetcherPort: Send + Sync {
    /// Downloads the payload behind `locator`.
    ///
    /// Non-success statuses are reported as errors.
    async fn fetch(&self, locator: &Locator) -> LoadResult<Bytes>;
}
