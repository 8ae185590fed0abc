//! viewkit - asynchronous image loading into views.
//!
//! Images are resolved through a process-wide memory cache and, on a miss,
//! downloaded and decoded off the presentation context. Each view has at most
//! one request in flight; a newer request cancels the older one and stale
//! results are never shown.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing cache, registry and HTTP adapters.
pub mod infrastructure;
/// Presentation layer containing the presentation context, views and loader.
pub mod presentation;
/// Generic helpers.
pub mod util;

pub use domain::{FallbackImage, LoadError, Locator, Tint, ViewState};
pub use presentation::{ImageLoader, ImageLoaderConfig, ImageView, MainContext};

/// Current version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = "viewkit";
