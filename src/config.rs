//! Dashboard configuration.
//!
//! Values come from the `[dashboard]` table of a TOML file, then from
//! environment variables, which win when set and non-empty:
//!
//! | Variable                  | Field                |
//! |---------------------------|----------------------|
//! | `SOLO_API_BASE_URL`       | `api_base_url`       |
//! | `SOLO_OAUTH_BASE_URL`     | `oauth_base_url`     |
//! | `SOLO_DEDUPE_INTERVAL_MS` | `dedupe_interval_ms` |

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Primary API, e.g. `https://api.solo.dev`. No trailing slash.
    pub api_base_url: String,
    /// OAuth endpoint hosting `/auth/google` and `/token`.
    pub oauth_base_url: String,
    /// Age under which a cached read is served without revalidation.
    pub dedupe_interval_ms: u64,
    pub alert_auto_close_ms: u64,
    pub alert_fade_ms: u64,
    pub request_timeout_secs: u64,
    /// Inbox size of the resource cache.
    pub cache_buffer: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            oauth_base_url: String::new(),
            dedupe_interval_ms: 2000,
            alert_auto_close_ms: 3000,
            alert_fade_ms: 250,
            request_timeout_secs: 30,
            cache_buffer: 64,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    dashboard: DashboardConfig,
}

impl DashboardConfig {
    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// A TOML file, then environment overrides on top.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::parse(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// A TOML string alone. Useful for testing.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config = Self::parse(content)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.dashboard)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(url) = env_string("SOLO_API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(url) = env_string("SOLO_OAUTH_BASE_URL") {
            self.oauth_base_url = url;
        }
        if let Some(ms) = env_string("SOLO_DEDUPE_INTERVAL_MS").and_then(|s| s.parse().ok()) {
            self.dedupe_interval_ms = ms;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.is_empty() {
            return Err(ConfigError::Missing("api_base_url"));
        }
        if self.oauth_base_url.is_empty() {
            return Err(ConfigError::Missing("oauth_base_url"));
        }
        Ok(())
    }

    pub fn dedupe_interval(&self) -> Duration {
        Duration::from_millis(self.dedupe_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_with_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [dashboard]
            api_base_url = "https://api.solo.dev"
            oauth_base_url = "https://auth.solo.dev"
            dedupe_interval_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.dedupe_interval(), Duration::from_millis(500));
        assert_eq!(config.alert_auto_close_ms, 3000);
        assert_eq!(config.alert_fade_ms, 250);
    }

    #[test]
    fn test_missing_base_url() {
        let err = DashboardConfig::from_toml_str("[dashboard]\napi_base_url = \"http://a\"").unwrap_err();
        assert!(matches!(err, ConfigError::Missing("oauth_base_url")));
    }

    #[test]
    fn test_bad_toml() {
        let err = DashboardConfig::from_toml_str("[dashboard\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
