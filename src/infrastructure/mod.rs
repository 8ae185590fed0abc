//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Image caching, request registry and HTTP fetching.
pub mod image;

pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager};
pub use image::{CacheStats, HttpImageFetcher, MemoryImageCache, TaskRegistry};
