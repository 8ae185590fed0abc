//! Loads images into views.
//!
//! Each request cancels the view's previous one, then resolves through the
//! memory cache and finally the network. It always ends with the view in the
//! applied or fallback state, never with an error surfaced to the caller.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::domain::entities::{Artifact, FallbackImage, ImageSource, LoadTicket, Locator};
use crate::domain::errors::{LoadError, LoadResult};
use crate::domain::ports::{ImageCachePort, ImageFetcherPort, TaskHandle, TaskRegistryPort};
use crate::infrastructure::image::{
    DEFAULT_CACHE_SIZE, DEFAULT_TIMEOUT_SECS, HttpImageFetcher, MemoryImageCache, TaskRegistry,
};
use crate::presentation::MainContext;
use crate::presentation::widgets::ImageView;

/// Configuration for the image loader.
#[derive(Debug, Clone)]
pub struct ImageLoaderConfig {
    /// Capacity of the shared memory cache.
    pub memory_cache_size: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Cross-fade duration when an image is applied.
    pub fade_duration: Duration,
}

impl Default for ImageLoaderConfig {
    fn default() -> Self {
        Self {
            memory_cache_size: DEFAULT_CACHE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fade_duration: Duration::ZERO,
        }
    }
}

/// Orchestrates cache lookups, downloads and view updates.
#[derive(Clone)]
pub struct ImageLoader {
    cache: Arc<dyn ImageCachePort>,
    tasks: Arc<dyn TaskRegistryPort>,
    fetcher: Arc<dyn ImageFetcherPort>,
    main: MainContext,
    config: ImageLoaderConfig,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("config", &self.config)
            .field("cached", &self.cache.len())
            .field("in_flight", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Creates a loader on the process-wide cache and task registry.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: ImageLoaderConfig, main: MainContext) -> LoadResult<Self> {
        MemoryImageCache::install_shared(config.memory_cache_size);
        let fetcher = HttpImageFetcher::new(Duration::from_secs(config.timeout_secs))?;

        Ok(Self::with_ports(
            config,
            main,
            MemoryImageCache::shared(),
            TaskRegistry::shared(),
            Arc::new(fetcher),
        ))
    }

    /// Creates a loader on explicit collaborators.
    #[must_use]
    pub fn with_ports(
        config: ImageLoaderConfig,
        main: MainContext,
        cache: Arc<dyn ImageCachePort>,
        tasks: Arc<dyn TaskRegistryPort>,
        fetcher: Arc<dyn ImageFetcherPort>,
    ) -> Self {
        Self {
            cache,
            tasks,
            fetcher,
            main,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ImageLoaderConfig {
        &self.config
    }

    /// Loads the image at `locator` into `view`.
    ///
    /// An invalid locator shows `fallback` without touching the network.
    /// Returns the ticket of the new request.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn load(&self, view: &ImageView, locator: &str, fallback: &FallbackImage) -> LoadTicket {
        let locator = Locator::parse(locator)
            .inspect_err(|e| warn!(id = %view.id(), error = %e, "Rejected image locator"))
            .ok();
        self.load_locator(view, locator, fallback)
    }

    /// Loads an already parsed locator into `view`; `None` shows `fallback`.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn load_locator(
        &self,
        view: &ImageView,
        locator: Option<Locator>,
        fallback: &FallbackImage,
    ) -> LoadTicket {
        let id = view.id();
        self.tasks.cancel(id);
        let ticket = view.next_ticket();

        let Some(locator) = locator else {
            let view = view.clone();
            let fallback = fallback.clone();
            self.main.dispatch(move || {
                view.show_fallback(ticket, &fallback);
            });
            return ticket;
        };

        trace!(id = %id, ticket = %ticket, locator = %locator, "Starting image request");

        let request = LoadRequest {
            view: view.clone(),
            ticket,
            locator,
            fallback: fallback.clone(),
            cache: self.cache.clone(),
            tasks: self.tasks.clone(),
            fetcher: self.fetcher.clone(),
            main: self.main.clone(),
            fade: self.config.fade_duration,
        };

        // The request waits until it is registered so that its own clear
        // can never run before the registration it removes.
        let (armed_tx, armed_rx) = oneshot::channel::<()>();
        let join = tokio::spawn(async move {
            if armed_rx.await.is_ok() {
                request.run().await;
            }
        });
        self.tasks
            .register(id, TaskHandle::new(ticket, join.abort_handle()));

        // Another thread may have started a newer request on this view
        // between the ticket and the registration.
        if !view.is_current(ticket) {
            self.tasks.clear(id, ticket);
            join.abort();
            debug!(id = %id, ticket = %ticket, "Image request superseded before start");
            return ticket;
        }
        let _ = armed_tx.send(());

        ticket
    }

    /// Cancels the in-flight request for `view`, leaving its content as is.
    pub fn cancel(&self, view: &ImageView) -> bool {
        self.tasks.cancel(view.id())
    }

    /// Returns true while a request for `view` is in flight.
    #[must_use]
    pub fn is_loading(&self, view: &ImageView) -> bool {
        self.tasks.is_current(view.id(), view.current_ticket())
    }

    /// Number of requests in flight across all views.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }
}

/// One load request, from cache lookup to the final view update.
struct LoadRequest {
    view: ImageView,
    ticket: LoadTicket,
    locator: Locator,
    fallback: FallbackImage,
    cache: Arc<dyn ImageCachePort>,
    tasks: Arc<dyn TaskRegistryPort>,
    fetcher: Arc<dyn ImageFetcherPort>,
    main: MainContext,
    fade: Duration,
}

impl LoadRequest {
    async fn run(self) {
        if let Some(artifact) = self.cache.get(self.locator.as_str()).await {
            trace!(
                id = %self.view.id(),
                locator = %self.locator,
                "Serving image from memory cache"
            );
            self.tasks.clear(self.view.id(), self.ticket);
            self.dispatch_apply(artifact, ImageSource::MemoryCache);
            return;
        }

        {
            let view = self.view.clone();
            let ticket = self.ticket;
            self.main.dispatch(move || {
                view.start_loading(ticket);
            });
        }

        let outcome = self.fetch_and_decode().await;
        self.tasks.clear(self.view.id(), self.ticket);

        match outcome {
            Ok(artifact) => {
                self.cache
                    .put(self.locator.as_str().to_string(), artifact.clone())
                    .await;
                debug!(
                    id = %self.view.id(),
                    locator = %self.locator,
                    source = "network",
                    "Image loaded successfully"
                );
                self.dispatch_apply(artifact, ImageSource::Network);
            }
            Err(LoadError::Cancelled) => {
                debug!(
                    id = %self.view.id(),
                    locator = %self.locator,
                    "Image request cancelled"
                );
            }
            Err(e) => {
                warn!(
                    id = %self.view.id(),
                    locator = %self.locator,
                    error = %e,
                    "Image load failed, showing fallback"
                );
                self.dispatch_fallback();
            }
        }
    }

    async fn fetch_and_decode(&self) -> LoadResult<Artifact> {
        let bytes = self.fetcher.fetch(&self.locator).await?;

        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| {
                if e.is_cancelled() {
                    LoadError::Cancelled
                } else {
                    LoadError::decode(format!("decode task panicked: {e}"))
                }
            })?
            .map_err(|e| LoadError::decode(e.to_string()))?;

        Ok(Arc::new(decoded))
    }

    fn dispatch_apply(&self, artifact: Artifact, source: ImageSource) {
        let view = self.view.clone();
        let ticket = self.ticket;
        let locator = self.locator.clone();
        let fade = self.fade;
        self.main.dispatch(move || {
            view.apply(ticket, artifact, source, locator, fade);
        });
    }

    fn dispatch_fallback(&self) {
        let view = self.view.clone();
        let ticket = self.ticket;
        let fallback = self.fallback.clone();
        self.main.dispatch(move || {
            view.show_fallback(ticket, &fallback);
        });
    }
}
