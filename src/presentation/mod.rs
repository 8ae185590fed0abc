//! Presentation layer: the presentation context, views and the loader that
//! drives them.

/// Single-task presentation context.
pub mod main_context;
/// Presentation services.
pub mod services;
/// Views.
pub mod widgets;

pub use main_context::MainContext;
pub use services::{ImageLoader, ImageLoaderConfig};
pub use widgets::ImageView;
