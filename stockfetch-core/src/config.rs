//! TOML configuration for the provider client.
//!
//! Every key is optional; anything left out falls back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub provider: ProviderConfig,
}

/// HTTP settings for the Yahoo provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Scheme and host of the chart API, without a trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FetcherConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = FetcherConfig::from_toml("").unwrap();
        assert_eq!(cfg, FetcherConfig::default());
        assert_eq!(cfg.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.provider.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_provider_section_keeps_other_defaults() {
        let cfg = FetcherConfig::from_toml(
            r#"
[provider]
timeout_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(cfg.provider.timeout_secs, 5);
        assert_eq!(cfg.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.provider.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let err = FetcherConfig::from_toml("[provider\nbase_url = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FetcherConfig::from_file(Path::new("/nonexistent/stockfetch.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/stockfetch.toml"));
    }

    #[test]
    fn load_without_path_uses_defaults() {
        assert_eq!(FetcherConfig::load(None).unwrap(), FetcherConfig::default());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockfetch.toml");
        let mut cfg = FetcherConfig::default();
        cfg.provider.base_url = "http://127.0.0.1:9999".into();
        std::fs::write(&path, toml::to_string_pretty(&cfg).unwrap()).unwrap();

        assert_eq!(FetcherConfig::from_file(&path).unwrap(), cfg);
    }
}
