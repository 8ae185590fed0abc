//! Config file persistence.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::app_config::AppConfig;
use crate::domain::entities::Tint;
use crate::infrastructure::image::DEFAULT_CACHE_SIZE;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("invalid tint color `{0}`")]
    InvalidTint(String),
}

/// Reads and writes one `config.toml`.
pub struct StorageManager {
    path: PathBuf,
}

impl StorageManager {
    /// Store for `config.toml` in the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigDirNotFound` if the platform has no config directory.
    pub fn new() -> Result<Self, ConfigError> {
        let dir = AppConfig::default_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
        Ok(Self::with_dir(&dir))
    }

    /// Store for `config.toml` inside `dir`.
    #[must_use]
    pub fn with_dir(dir: &Path) -> Self {
        Self::at(dir.join(CONFIG_FILE_NAME))
    }

    /// Store for an explicit file.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// A missing file is written with defaults. A malformed file is left
    /// as is and defaults are used. Out-of-range values are replaced by
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the default
    /// cannot be written.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Config file not found, writing defaults");
                let config = AppConfig::default();
                self.save_config(&config)?;
                return Ok(config);
            }
            Err(e) => return Err(e.into()),
        };

        let config = toml::from_str::<AppConfig>(&content).unwrap_or_else(|e| {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Malformed config file, using defaults"
            );
            AppConfig::default()
        });
        Ok(self.sanitize(config))
    }

    /// Writes `config` atomically, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on serialization or I/O failure.
    pub fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn sanitize(&self, mut config: AppConfig) -> AppConfig {
        if config.loader.memory_cache_size == 0 {
            warn!(
                path = %self.path.display(),
                default = DEFAULT_CACHE_SIZE,
                "memory_cache_size must be positive, using default"
            );
            config.loader.memory_cache_size = DEFAULT_CACHE_SIZE;
        }
        if Tint::from_hex(&config.fallback.tint).is_none() {
            warn!(
                path = %self.path.display(),
                tint = %config.fallback.tint,
                "Unrecognised fallback tint, using default"
            );
            config.fallback.tint = Tint::SYSTEM_GRAY.to_string();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::LogLevel;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_written_with_defaults() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(&dir.path().join("viewkit"));

        let config = manager.load_config().unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(manager.path().exists());

        let reloaded = manager.load_config().unwrap();
        assert_eq!(reloaded.fallback.tint, config.fallback.tint);
        assert_eq!(reloaded.loader.memory_cache_size, DEFAULT_CACHE_SIZE);
    }

    #[test]
    fn test_malformed_file_is_left_untouched() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path());
        fs::write(manager.path(), "[loader\nmemory_cache_size = ").unwrap();

        let config = manager.load_config().unwrap();
        assert_eq!(config.loader.memory_cache_size, DEFAULT_CACHE_SIZE);
        let content = fs::read_to_string(manager.path()).unwrap();
        assert_eq!(content, "[loader\nmemory_cache_size = ");
    }

    #[test]
    fn test_explicit_file_is_read() {
        let dir = tempdir().unwrap();
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "[loader]\nmemory_cache_size = 3\nfade_duration_ms = 120\n").unwrap();

        let config = StorageManager::at(&custom).load_config().unwrap();
        assert_eq!(config.loader.memory_cache_size, 3);
        assert_eq!(config.loader.fade_duration_ms, 120);
        assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_out_of_range_values_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path());
        fs::write(
            manager.path(),
            "[loader]\nmemory_cache_size = 0\n\n[fallback]\ntint = \"gray\"\n",
        )
        .unwrap();

        let config = manager.load_config().unwrap();
        assert_eq!(config.loader.memory_cache_size, DEFAULT_CACHE_SIZE);
        assert_eq!(config.fallback.tint, Tint::SYSTEM_GRAY.to_string());
    }

    #[test]
    fn test_save_then_load_keeps_values() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path());
        let mut config = AppConfig::default();
        config.loader.timeout_secs = 7;
        config.fallback.tint = "#102030".to_string();

        manager.save_config(&config).unwrap();
        let loaded = manager.load_config().unwrap();

        assert_eq!(loaded.loader.timeout_secs, 7);
        assert_eq!(loaded.fallback.tint, "#102030");
    }
}
