//! Domain entity definitions.

mod consumer;
mod image;
mod view_state;

pub use consumer::{ConsumerId, LoadTicket};
pub use image::{
    Artifact, FallbackImage, ImageSource, Locator, PLACEHOLDER_SIZE, Tint, default_placeholder,
};
pub use view_state::{LoadPhase, Transition, ViewState};
