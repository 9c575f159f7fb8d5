//! Dashboard configuration
//!
//! Read from an optional TOML file, e.g. `~/.config/dineboard/config.toml`:
//!
//! ```toml
//! api_base_url = "http://localhost:3001/api"
//! output_dir = "reports"
//! default_period = "30"
//! cache_ttl_secs = 120
//! ```

use crate::cache::DEFAULT_TTL;
use crate::client::DEFAULT_API_BASE_URL;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Longest accepted response cache TTL (one day)
pub const MAX_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// API origin including the `/api` prefix
    pub api_base_url: String,

    /// Where export files are written
    pub output_dir: PathBuf,

    /// Look-back period (days) when no filter is given
    pub default_period: String,

    /// Response cache TTL, shared by every key of a session
    pub cache_ttl_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
            default_period: "30".to_string(),
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
        }
    }
}

impl DashboardConfig {
    /// Load from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CoreError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml(&content)
    }

    /// Parse TOML text
    pub fn from_toml(content: &str) -> Result<Self, CoreError> {
        let config: Self = toml::from_str(content).map_err(|e| CoreError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values a session cannot be built from
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.api_base_url.trim().is_empty() {
            return Err(CoreError::InvalidConfig {
                message: "api_base_url must not be empty".to_string(),
            });
        }
        if self.cache_ttl_secs == 0 {
            return Err(CoreError::InvalidConfig {
                message: "cache_ttl_secs must be greater than zero".to_string(),
            });
        }
        if self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(CoreError::InvalidConfig {
                message: format!(
                    "cache_ttl_secs must be at most {} (one day), got {}",
                    MAX_CACHE_TTL_SECS, self.cache_ttl_secs
                ),
            });
        }
        Ok(())
    }

    /// Default config path under the user's config directory
    pub fn default_path(config_dir: &Path) -> PathBuf {
        config_dir.join("dineboard").join(CONFIG_FILE_NAME)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:3001/api");
        assert_eq!(config.default_period, "30");
        assert_eq!(config.cache_ttl(), Duration::from_secs(120));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DashboardConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "output_dir = \"reports\"\ncache_ttl_secs = 30\n").unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.cache_ttl_secs, 30);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_malformed_file_is_invalid_config() {
        assert!(matches!(
            DashboardConfig::from_toml("cache_ttl_secs = \"soon\""),
            Err(CoreError::InvalidConfig { .. })
        ));
        assert!(matches!(
            DashboardConfig::from_toml("cache_ttl_secs = 0"),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_cache_ttl_upper_bound() {
        let err = DashboardConfig::from_toml("cache_ttl_secs = 99999999999").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
        assert!(err.to_string().contains("cache_ttl_secs"));

        let config = DashboardConfig::from_toml("cache_ttl_secs = 86400").unwrap();
        assert_eq!(config.cache_ttl(), Duration::from_secs(MAX_CACHE_TTL_SECS));
        assert!(DashboardConfig::from_toml("cache_ttl_secs = 86401").is_err());
    }

    #[test]
    fn test_default_path() {
        let path = DashboardConfig::default_path(Path::new("/home/u/.config"));
        assert_eq!(path, PathBuf::from("/home/u/.config/dineboard/config.toml"));
    }
}
