//! Image load error types.

use thiserror::Error;

/// Result type for image loading operations.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Reasons a load request ends in the fallback state.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum LoadError {
    #[error("invalid locator `{input}`: {reason}")]
    InvalidLocator { input: String, reason: String },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("unexpected HTTP status {status}")]
    HttpStatus { status: u16 },

    #[error("payload is not a decodable image: {message}")]
    Decode { message: String },

    #[error("request was cancelled")]
    Cancelled,

    #[error("failed to create HTTP client: {message}")]
    Client { message: String },
}

impl LoadError {
    /// Creates invalid locator error.
    #[must_use]
    pub fn invalid_locator(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocator {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates client construction error.
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// Returns whether the failure happened on the wire.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::HttpStatus { .. })
    }

    /// Returns whether the request was superseded rather than failed.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
