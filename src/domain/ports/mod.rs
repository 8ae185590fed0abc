//! Port definitions.

mod image_cache_port;
mod image_fetcher_port;
mod task_registry_port;

pub use image_cache_port::ImageCachePort;
pub use image_fetcher_port::ImageFetcherPort;
pub use task_registry_port::{TaskHandle, TaskRegistryPort};

#[cfg(test)]
pub use image_fetcher_port::MockImageFetcherPort;

#[cfg(test)]
pub mod mocks {
    pub use super::image_fetcher_port::mock::{ScriptedFetcher, png_bytes};
    pub use super::task_registry_port::mock::NonCancellingRegistry;
}
