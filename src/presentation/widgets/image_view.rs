//! Image-bearing view driven by the image loader.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::trace;

use crate::domain::entities::{
    Artifact, ConsumerId, FallbackImage, ImageSource, LoadPhase, LoadTicket, Locator, ViewState,
};
use crate::util::Binding;

struct Inner {
    id: ConsumerId,
    ticket: AtomicU64,
    state: Binding<ViewState>,
    settled: Notify,
}

/// A view that displays one image at a time.
///
/// Cloning yields another handle to the same view. Mutators carry the ticket
/// of the request that produced them; updates from superseded requests are
/// ignored.
#[derive(Clone)]
pub struct ImageView {
    inner: Arc<Inner>,
}

impl ImageView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                id: ConsumerId::next(),
                ticket: AtomicU64::new(LoadTicket::NONE.0),
                state: Binding::new(ViewState::default()),
                settled: Notify::new(),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> ConsumerId {
        self.inner.id
    }

    /// Ticket of the most recent request.
    #[must_use]
    pub fn current_ticket(&self) -> LoadTicket {
        LoadTicket(self.inner.ticket.load(Ordering::SeqCst))
    }

    /// Starts a new request, superseding every earlier one.
    pub(crate) fn next_ticket(&self) -> LoadTicket {
        LoadTicket(self.inner.ticket.fetch_add(1, Ordering::SeqCst)).next()
    }

    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.current_ticket() == ticket
    }

    /// Snapshot of the visual state.
    #[must_use]
    pub fn state(&self) -> ViewState {
        self.inner.state.get()
    }

    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.inner.state.with(|s| s.phase)
    }

    /// Observes every visual change. Replaces any previous observer.
    pub fn on_state_change(&self, callback: impl Fn(&ViewState) + Send + Sync + 'static) {
        self.inner.state.on_value_change(callback);
    }

    /// Waits until the latest request reached Apply or Fallback.
    ///
    /// Never resolves if the latest request was cancelled without a
    /// replacement.
    pub async fn settled(&self) -> ViewState {
        loop {
            let notified = self.inner.settled.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let state = self.state();
            if state.is_settled_for(self.current_ticket()) {
                return state;
            }
            notified.await;
        }
    }

    /// Clears the content and shows the loading indicator.
    pub fn start_loading(&self, ticket: LoadTicket) -> bool {
        self.mutate(ticket, "start_loading", |s| s.begin_loading(ticket))
    }

    /// Cross-fades to `artifact`.
    pub fn apply(
        &self,
        ticket: LoadTicket,
        artifact: Artifact,
        source: ImageSource,
        locator: Locator,
        fade: Duration,
    ) -> bool {
        self.mutate(ticket, "apply", |s| {
            s.apply(ticket, artifact, source, locator, fade);
        })
    }

    /// Shows the fallback placeholder and tint.
    pub fn show_fallback(&self, ticket: LoadTicket, fallback: &FallbackImage) -> bool {
        self.mutate(ticket, "fallback", |s| s.show_fallback(ticket, fallback))
    }

    fn mutate(&self, ticket: LoadTicket, action: &str, f: impl FnOnce(&mut ViewState)) -> bool {
        if !self.is_current(ticket) {
            trace!(
                id = %self.id(),
                ticket = %ticket,
                current = %self.current_ticket(),
                action,
                "Ignoring stale view update"
            );
            return false;
        }
        self.inner.state.update(f);
        self.inner.settled.notify_waiters();
        true
    }
}

impl Default for ImageView {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ImageView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageView")
            .field("id", &self.id())
            .field("ticket", &self.current_ticket())
            .field("state", &self.state())
            .finish()
    }
}
