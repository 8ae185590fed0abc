//! In-memory LRU image cache implementation.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::domain::entities::Artifact;
use crate::domain::ports::ImageCachePort;

/// Default maximum number of images to cache in memory.
pub const DEFAULT_CACHE_SIZE: usize = 50;

static SHARED: OnceLock<Arc<MemoryImageCache>> = OnceLock::new();

/// In-memory LRU cache for decoded images, keyed by locator.
/// Thread-safe and optimized for frequent reads.
pub struct MemoryImageCache {
    cache: RwLock<LruCache<String, Artifact>>,
    capacity: NonZeroUsize,
    // Entry count, written under the write lock after every change.
    entries: AtomicUsize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    /// Creates a new cache with the specified capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(cap)),
            capacity: cap,
            entries: AtomicUsize::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a new cache with the default capacity.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }

    /// Returns the process-wide cache, creating it on first use.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        SHARED
            .get_or_init(|| Arc::new(Self::with_default_capacity()))
            .clone()
    }

    /// Creates the process-wide cache with `capacity`.
    ///
    /// Returns false if the shared cache already exists; its capacity is
    /// left unchanged.
    pub fn install_shared(capacity: usize) -> bool {
        let installed = SHARED.set(Arc::new(Self::new(capacity))).is_ok();
        if !installed {
            debug!(capacity, "Shared image cache already initialized");
        }
        installed
    }

    /// Maximum number of images kept.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }

    /// Peeks at an image without promoting it in the LRU or counting a hit.
    pub async fn peek(&self, key: &str) -> Option<Artifact> {
        let cache = self.cache.read().await;
        cache.peek(key).cloned()
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl std::fmt::Debug for MemoryImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryImageCache")
            .field("capacity", &self.capacity)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

#[async_trait::async_trait]
impl ImageCachePort for MemoryImageCache {
    async fn get(&self, key: &str) -> Option<Artifact> {
        let mut cache = self.cache.write().await;
        if let Some(img) = cache.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key, "Memory cache hit");
            Some(img.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key, "Memory cache miss");
            None
        }
    }

    async fn put(&self, key: String, artifact: Artifact) {
        let mut cache = self.cache.write().await;
        debug!(key = %key, "Storing image in memory cache");
        if let Some((evicted, _)) = cache.push(key, artifact) {
            trace!(key = %evicted, "Memory cache entry replaced or evicted");
        }
        self.entries.store(cache.len(), Ordering::Release);
    }

    async fn evict(&self, key: &str) {
        let mut cache = self.cache.write().await;
        if cache.pop(key).is_some() {
            self.entries.store(cache.len(), Ordering::Release);
            debug!(key, "Evicted image from memory cache");
        }
    }

    async fn purge(&self) {
        let mut cache = self.cache.write().await;
        let count = cache.len();
        cache.clear();
        self.entries.store(0, Ordering::Release);
        debug!(count, "Purged memory image cache");
    }

    fn len(&self) -> usize {
        self.entries.load(Ordering::Acquire)
    }
}
