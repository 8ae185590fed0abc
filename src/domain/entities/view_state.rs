//! Visual state of an image view.

use std::time::Duration;

use super::{Artifact, FallbackImage, ImageSource, LoadTicket, Locator, Tint};

/// Where a view is in its load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// No request has produced visual output yet.
    #[default]
    Idle,
    /// A download is in flight and the loading indicator is visible.
    Loading,
    /// A resolved image is displayed.
    Applied,
    /// The fallback placeholder is displayed.
    Fallback,
}

impl LoadPhase {
    /// Returns true for phases that end a request.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Applied | Self::Fallback)
    }

    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Animation used when the content changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Alpha goes from 0 to 1 over `duration`.
    CrossFade { duration: Duration },
}

/// Everything a renderer needs to draw an image view.
#[derive(Clone)]
pub struct ViewState {
    pub image: Option<Artifact>,
    pub tint: Option<Tint>,
    pub alpha: f32,
    pub loading_indicator: bool,
    pub phase: LoadPhase,
    pub source: Option<ImageSource>,
    pub locator: Option<Locator>,
    pub transition: Option<Transition>,
    /// Request that produced this state.
    pub ticket: LoadTicket,
}

impl ViewState {
    /// Clears the content and shows the loading indicator.
    pub fn begin_loading(&mut self, ticket: LoadTicket) {
        self.image = None;
        self.loading_indicator = true;
        self.phase = LoadPhase::Loading;
        self.source = None;
        self.transition = None;
        self.ticket = ticket;
    }

    /// Cross-fades to a resolved image.
    pub fn apply(
        &mut self,
        ticket: LoadTicket,
        artifact: Artifact,
        source: ImageSource,
        locator: Locator,
        fade: Duration,
    ) {
        self.image = Some(artifact);
        self.tint = None;
        self.alpha = 1.0;
        self.transition = Some(Transition::CrossFade { duration: fade });
        self.loading_indicator = false;
        self.phase = LoadPhase::Applied;
        self.source = Some(source);
        self.locator = Some(locator);
        self.ticket = ticket;
    }

    /// Shows the placeholder and tint.
    pub fn show_fallback(&mut self, ticket: LoadTicket, fallback: &FallbackImage) {
        self.image.clone_from(&fallback.image);
        self.tint = Some(fallback.tint);
        self.alpha = 1.0;
        self.transition = None;
        self.loading_indicator = false;
        self.phase = LoadPhase::Fallback;
        self.source = None;
        self.locator = None;
        self.ticket = ticket;
    }

    /// Returns true once `ticket`'s request reached Apply or Fallback.
    #[must_use]
    pub fn is_settled_for(&self, ticket: LoadTicket) -> bool {
        self.ticket == ticket && self.phase.is_terminal()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            image: None,
            tint: None,
            alpha: 1.0,
            loading_indicator: false,
            phase: LoadPhase::Idle,
            source: None,
            locator: None,
            transition: None,
            ticket: LoadTicket::NONE,
        }
    }
}

impl std::fmt::Debug for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewState")
            .field(
                "image",
                &self.image.as_ref().map(|img| (img.width(), img.height())),
            )
            .field("tint", &self.tint)
            .field("alpha", &self.alpha)
            .field("loading_indicator", &self.loading_indicator)
            .field("phase", &self.phase)
            .field("source", &self.source)
            .field("locator", &self.locator.as_ref().map(Locator::as_str))
            .field("transition", &self.transition)
            .field("ticket", &self.ticket)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn artifact() -> Artifact {
        Arc::new(image::DynamicImage::new_rgb8(4, 4))
    }

    #[test]
    fn test_loading_then_apply() {
        let mut state = ViewState::default();
        let ticket = LoadTicket(1);

        state.begin_loading(ticket);
        assert!(state.loading_indicator);
        assert!(state.image.is_none());
        assert!(!state.is_settled_for(ticket));

        let locator = Locator::parse("https://example.com/a.png").unwrap();
        state.apply(
            ticket,
            artifact(),
            ImageSource::Network,
            locator,
            Duration::from_millis(250),
        );

        assert!(!state.loading_indicator);
        assert_eq!(state.phase, LoadPhase::Applied);
        assert!((state.alpha - 1.0).abs() < f32::EPSILON);
        assert_eq!(
            state.transition,
            Some(Transition::CrossFade {
                duration: Duration::from_millis(250)
            })
        );
        assert!(state.is_settled_for(ticket));
        assert!(!state.is_settled_for(ticket.next()));
    }

    #[test]
    fn test_fallback_sets_tint_and_hides_indicator() {
        let mut state = ViewState::default();
        state.begin_loading(LoadTicket(3));

        let tint = Tint::rgb(10, 20, 30);
        state.show_fallback(LoadTicket(3), &FallbackImage::tinted(tint));

        assert_eq!(state.phase, LoadPhase::Fallback);
        assert_eq!(state.tint, Some(tint));
        assert!(state.image.is_some());
        assert!(!state.loading_indicator);
    }

    #[test]
    fn test_fallback_without_image_clears_content() {
        let mut state = ViewState {
            image: Some(artifact()),
            ..ViewState::default()
        };
        state.show_fallback(LoadTicket(1), &FallbackImage::new(None, Tint::SYSTEM_GRAY));
        assert!(state.image.is_none());
    }
}
