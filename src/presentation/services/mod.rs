//! Presentation services.

pub mod image_loader;

pub use image_loader::{ImageLoader, ImageLoaderConfig};
