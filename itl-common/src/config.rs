//! Configuration file loading
//!
//! The TOML file is optional. A missing file yields built-in defaults so the
//! tools can run from environment variables and command-line flags alone.
//!
//! Resolution priority for individual values (applied by each tool):
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Built-in default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scout settings (optional)
    #[serde(default)]
    pub scout: ScoutSection,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    ///
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `[scout]` table of the config file
///
/// Every field is optional here; the scout resolves missing values from the
/// environment or its compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoutSection {
    /// Persisted-query hash for the champion pool query
    pub champions_hash: Option<String>,
    /// Persisted-query hash for the matchup pool query
    pub matchups_hash: Option<String>,
    /// Maximum number of rows requested per pool
    pub max_games: Option<u32>,
    /// Maximum number of fetches in flight
    pub max_concurrency: Option<usize>,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Per-fetch deadline in seconds (no deadline when unset)
    pub task_timeout_secs: Option<u64>,
    /// Client-side request rate limit (unthrottled when unset)
    pub requests_per_second: Option<u32>,
}

/// Default config file location: `<config dir>/itl/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("itl").join("config.toml"))
}

/// Load configuration from a TOML file
///
/// Returns `Ok(None)` for a missing file; the caller falls back to defaults
/// once logging is up. A file that exists but cannot be parsed is a
/// configuration error.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_toml_config(&dir.path().join("absent.toml")).unwrap().is_none());

        let config = TomlConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(config.scout.champions_hash.is_none());
        assert!(config.scout.max_concurrency.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_tables() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[scout]\nmax_games = 50\nmax_concurrency = 3").unwrap();

        let config = load_toml_config(&path).unwrap().expect("file exists");
        assert_eq!(config.scout.max_games, Some(50));
        assert_eq!(config.scout.max_concurrency, Some(3));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scout\nmax_games = ").unwrap();

        let err = load_toml_config(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_path_ends_with_itl_config() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("itl/config.toml"));
        }
    }
}
