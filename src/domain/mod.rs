//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{FallbackImage, Locator, Tint, ViewState};
pub use errors::{LoadError, LoadResult};
pub use ports::{ImageCachePort, ImageFetcherPort, TaskRegistryPort};
