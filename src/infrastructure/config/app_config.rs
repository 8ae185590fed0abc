//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use super::storage::ConfigError;
use crate::domain::entities::{FallbackImage, Tint};
use crate::infrastructure::image::{DEFAULT_CACHE_SIZE, DEFAULT_TIMEOUT_SECS};
use crate::presentation::services::ImageLoaderConfig;

const APP_NAME: &str = "viewkit";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Image loader settings.
    #[serde(default)]
    pub loader: LoaderSection,

    /// Fallback appearance.
    #[serde(default)]
    pub fallback: FallbackSection,
}

/// Image loader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderSection {
    /// Maximum images kept in the memory cache.
    #[serde(default = "default_memory_cache_size")]
    pub memory_cache_size: usize,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cross-fade duration in milliseconds.
    #[serde(default)]
    pub fade_duration_ms: u64,
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            memory_cache_size: default_memory_cache_size(),
            timeout_secs: default_timeout_secs(),
            fade_duration_ms: 0,
        }
    }
}

/// Fallback appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackSection {
    /// Tint as `#RRGGBB` or `#RRGGBBAA`.
    #[serde(default = "default_tint")]
    pub tint: String,
}

impl Default for FallbackSection {
    fn default() -> Self {
        Self {
            tint: default_tint(),
        }
    }
}

const fn default_memory_cache_size() -> usize {
    DEFAULT_CACHE_SIZE
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_tint() -> String {
    Tint::SYSTEM_GRAY.to_string()
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(size) = args.memory_cache_size {
            self.loader.memory_cache_size = size;
        }
        if let Some(timeout) = args.timeout_secs {
            self.loader.timeout_secs = timeout;
        }
        if let Some(fade) = args.fade_ms {
            self.loader.fade_duration_ms = fade;
        }
        if let Some(tint) = &args.tint {
            self.fallback.tint.clone_from(tint);
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Builds the loader configuration.
    #[must_use]
    pub const fn loader_config(&self) -> ImageLoaderConfig {
        ImageLoaderConfig {
            memory_cache_size: self.loader.memory_cache_size,
            timeout_secs: self.loader.timeout_secs,
            fade_duration: Duration::from_millis(self.loader.fade_duration_ms),
        }
    }

    /// Builds the fallback image from the configured tint.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidTint` if the tint is not a hex color.
    pub fn fallback_image(&self) -> Result<FallbackImage, ConfigError> {
        let tint = Tint::from_hex(&self.fallback.tint)
            .ok_or_else(|| ConfigError::InvalidTint(self.fallback.tint.clone()))?;
        Ok(FallbackImage::tinted(tint))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            loader: LoaderSection::default(),
            fallback: FallbackSection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r##"
            log_level = "debug"

            [loader]
            timeout_secs = 5
            fade_duration_ms = 200

            [fallback]
            tint = "#FF0000"
        "##;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.loader.timeout_secs, 5);
        assert_eq!(config.loader.memory_cache_size, DEFAULT_CACHE_SIZE);
        assert_eq!(
            config.loader_config().fade_duration,
            Duration::from_millis(200)
        );
        assert_eq!(
            config.fallback_image().unwrap().tint,
            Tint::rgb(0xFF, 0, 0)
        );
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.log_path.is_none());
        assert_eq!(config.loader.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.fallback_image().unwrap().tint, Tint::SYSTEM_GRAY);
    }

    #[test]
    fn test_invalid_tint_is_rejected() {
        let mut config = AppConfig::default();
        config.fallback.tint = "grey-ish".to_string();

        assert!(matches!(
            config.fallback_image(),
            Err(ConfigError::InvalidTint(_))
        ));
    }

    #[test]
    fn test_args_override_file_values() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "viewkit",
            "--log-level",
            "trace",
            "--memory-cache-size",
            "8",
            "--fade-ms",
            "150",
            "--tint",
            "#000000",
            "https://example.com/a.png",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.loader.memory_cache_size, 8);
        assert_eq!(config.loader.fade_duration_ms, 150);
        assert_eq!(config.fallback.tint, "#000000");
        assert_eq!(config.loader.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_level_display_matches_filter_syntax() {
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Trace.to_string(), "trace");
    }
}
