//! Image domain types: locators, artifacts and fallback configuration.

use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use crate::domain::errors::LoadError;

/// A decoded, immutable image shared between the cache and views.
pub type Artifact = Arc<image::DynamicImage>;

/// Side length of the built-in placeholder image.
pub const PLACEHOLDER_SIZE: u32 = 64;

static DEFAULT_PLACEHOLDER: LazyLock<Artifact> = LazyLock::new(|| {
    Arc::new(image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        PLACEHOLDER_SIZE,
        PLACEHOLDER_SIZE,
        image::Rgba([199, 199, 204, 255]),
    )))
});

/// Returns the built-in neutral placeholder image.
#[must_use]
pub fn default_placeholder() -> Artifact {
    DEFAULT_PLACEHOLDER.clone()
}

/// Validated address of an image resource.
///
/// Only absolute `http` and `https` URLs are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(reqwest::Url);

impl Locator {
    /// Parses and validates a locator string.
    ///
    /// # Errors
    /// Returns [`LoadError::InvalidLocator`] for empty input, unparsable URLs
    /// and non-HTTP schemes.
    pub fn parse(input: &str) -> Result<Self, LoadError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LoadError::invalid_locator(input, "locator is empty"));
        }

        let url = reqwest::Url::parse(trimmed)
            .map_err(|e| LoadError::invalid_locator(input, e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(LoadError::invalid_locator(
                input,
                format!("unsupported scheme `{other}`"),
            )),
        }
    }

    /// Returns the canonical string form, also used as the cache key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the underlying URL.
    #[must_use]
    pub const fn url(&self) -> &reqwest::Url {
        &self.0
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Locator {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Locator {
    type Error = LoadError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Where an applied image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from the in-memory cache.
    MemoryCache,
    /// Downloaded and decoded.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// An RGBA tint color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Tint {
    /// System gray, the default fallback tint.
    pub const SYSTEM_GRAY: Self = Self::rgb(0x8E, 0x8E, 0x93);

    /// Creates an opaque tint.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();

        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => None,
        }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::SYSTEM_GRAY
    }
}

impl std::fmt::Display for Tint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.a == 0xFF {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02X}{:02X}{:02X}{:02X}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

/// Placeholder shown when no real image can be resolved.
#[derive(Clone)]
pub struct FallbackImage {
    /// Placeholder image; `None` clears the view's image.
    pub image: Option<Artifact>,
    /// Tint applied together with the placeholder.
    pub tint: Tint,
}

impl FallbackImage {
    #[must_use]
    pub const fn new(image: Option<Artifact>, tint: Tint) -> Self {
        Self { image, tint }
    }

    /// Keeps the default placeholder but uses another tint.
    #[must_use]
    pub fn tinted(tint: Tint) -> Self {
        Self {
            image: Some(default_placeholder()),
            tint,
        }
    }
}

impl Default for FallbackImage {
    fn default() -> Self {
        Self::tinted(Tint::SYSTEM_GRAY)
    }
}

impl std::fmt::Debug for FallbackImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackImage")
            .field("has_image", &self.image.is_some())
            .field("tint", &self.tint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://example.com/a.png" ; "https")]
    #[test_case("http://example.com/a.png?size=64" ; "http_with_query")]
    #[test_case("  https://example.com/a.png  " ; "surrounding_whitespace")]
    fn test_locator_accepts(input: &str) {
        assert!(Locator::parse(input).is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case("not a url" ; "garbage")]
    #[test_case("ftp://example.com/a.png" ; "ftp_scheme")]
    #[test_case("file:///tmp/a.png" ; "file_scheme")]
    #[test_case("http://" ; "missing_host")]
    fn test_locator_rejects(input: &str) {
        let err = Locator::parse(input).unwrap_err();
        assert!(matches!(err, LoadError::InvalidLocator { .. }));
    }

    #[test]
    fn test_locator_cache_key_is_canonical() {
        let a = Locator::parse("https://Example.com/a.png").unwrap();
        let b = Locator::parse("https://example.com/a.png").unwrap();
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test_case("#8E8E93", Some(Tint::SYSTEM_GRAY) ; "rgb")]
    #[test_case("ff000080", Some(Tint { r: 255, g: 0, b: 0, a: 128 }) ; "rgba_without_hash")]
    #[test_case("#12345", None ; "too_short")]
    #[test_case("#GGGGGG", None ; "not_hex")]
    #[test_case("#+F+F+F", None ; "signed_channels")]
    fn test_tint_from_hex(input: &str, expected: Option<Tint>) {
        assert_eq!(Tint::from_hex(input), expected);
    }

    #[test]
    fn test_tint_display() {
        assert_eq!(Tint::SYSTEM_GRAY.to_string(), "#8E8E93");
        assert_eq!(
            Tint { r: 1, g: 2, b: 3, a: 4 }.to_string(),
            "#01020304"
        );
    }

    #[test]
    fn test_default_fallback_uses_shared_placeholder() {
        let fallback = FallbackImage::default();
        let image = fallback.image.unwrap();
        assert!(Arc::ptr_eq(&image, &default_placeholder()));
        assert_eq!(image.width(), PLACEHOLDER_SIZE);
        assert_eq!(fallback.tint, Tint::SYSTEM_GRAY);
    }
}
