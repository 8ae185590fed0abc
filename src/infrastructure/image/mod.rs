//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with LRU eviction
//! - The in-flight request registry
//! - HTTP payload fetching

pub mod http_fetcher;
pub mod memory_cache;
pub mod task_registry;

pub use http_fetcher::{DEFAULT_TIMEOUT_SECS, HttpImageFetcher};
pub use memory_cache::{CacheStats, DEFAULT_CACHE_SIZE, MemoryImageCache};
pub use task_registry::TaskRegistry;
