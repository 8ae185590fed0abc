//! Port definition for image caching.

use crate::domain::entities::Artifact;

/// Port for caching decoded images by locator key.
/// Implementations must be thread-safe; a missing entry is a normal miss.
#[async_trait::async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Attempts to get an image from the cache.
    async fn get(&self, key: &str) -> Option<Artifact>;

    /// Stores an image, replacing any previous value for `key`.
    async fn put(&self, key: String, artifact: Artifact);

    /// Removes an image from the cache.
    async fn evict(&self, key: &str);

    /// Drops every entry, as under memory pressure.
    async fn purge(&self);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
