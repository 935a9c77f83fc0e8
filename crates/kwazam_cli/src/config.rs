//! Front-end configuration (`kwazam.toml`).

use derive_getters::Getters;
use derive_more::{Display, Error};
use kwazam::SaveStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Settings for the terminal front end.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct KwazamConfig {
    /// Directory that named saves are written to.
    #[serde(default = "default_save_dir")]
    save_dir: PathBuf,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// Draw the board from the side of the player on turn.
    #[serde(default = "default_flip_board")]
    flip_board: bool,
}

fn default_save_dir() -> PathBuf {
    PathBuf::from(SaveStore::DEFAULT_DIR)
}

fn default_log_filter() -> String {
    "warn".to_string()
}

fn default_flip_board() -> bool {
    true
}

impl Default for KwazamConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            log_filter: default_log_filter(),
            flip_board: default_flip_board(),
        }
    }
}

impl KwazamConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(save_dir = %config.save_dir.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save store rooted at the configured directory.
    pub fn save_store(&self) -> SaveStore {
        SaveStore::new(&self.save_dir)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = KwazamConfig::load_or_default(dir.path().join("kwazam.toml")).unwrap();
        assert_eq!(config, KwazamConfig::default());
        assert_eq!(config.save_dir(), &PathBuf::from("savefiles"));
        assert_eq!(config.log_filter(), "warn");
        assert!(*config.flip_board());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kwazam.toml");
        std::fs::write(&path, "save_dir = \"games\"\nflip_board = false\n").unwrap();

        let config = KwazamConfig::load_or_default(&path).unwrap();
        assert_eq!(config.save_dir(), &PathBuf::from("games"));
        assert!(!*config.flip_board());
        assert_eq!(config.log_filter(), "warn");
        assert_eq!(config.save_store().dir(), Path::new("games"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kwazam.toml");
        std::fs::write(&path, "flip_board = \"sometimes\"\n").unwrap();
        let err = KwazamConfig::load_or_default(&path).unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
    }
}
