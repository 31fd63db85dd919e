// src/core/config.rs

use crate::constants::{DEFAULT_PREFIX, DEFAULT_WORKERS};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Engine configuration supplied by the embedding application.
///
/// Every field has a default, so an empty file (or no file at all) is a
/// valid configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    /// The prefix that marks a message as a command invocation.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Number of worker threads in the dispatch pool.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            workers: default_workers(),
        }
    }
}

impl DispatchConfig {
    /// Loads the configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading dispatch config from '{}'", path.display());
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads from the given path, or falls back to defaults when the file
    /// does not exist. Parse errors are still surfaced.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No config file at '{}', using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = DispatchConfig::default();
        assert_eq!(config.prefix, DEFAULT_PREFIX);
        assert_eq!(config.workers, DEFAULT_WORKERS);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: DispatchConfig = toml::from_str("prefix = \"~\"").unwrap();
        assert_eq!(config.prefix, "~");
        assert_eq!(config.workers, DEFAULT_WORKERS);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "prefix = \"$\"\nworkers = 8").unwrap();
        file.flush().unwrap();

        let config = DispatchConfig::load(file.path()).unwrap();
        assert_eq!(config.prefix, "$");
        assert_eq!(config.workers, 8);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config =
            DispatchConfig::load_or_default(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(config, DispatchConfig::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "workers = \"many\"").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            DispatchConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
