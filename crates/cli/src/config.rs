use anyhow::{Context, Result};
use keyward_client::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_BASE_URL: &str = "KEYWARD_BASE_URL";
pub const ENV_TOKEN: &str = "KEYWARD_TOKEN";

/// `keyward` configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// API connection settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Where the API lives and how to authenticate against it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Server root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent in the `Authorization` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("keyward/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::info!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from default locations in order:
    /// 1. ./keyward.toml (current directory)
    /// 2. `<user config dir>/keyward/config.toml`
    /// 3. Built-in defaults
    pub fn load_default() -> Result<Self> {
        for path in Self::default_paths() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        tracing::info!("No config file found, using built-in defaults");
        Ok(Self::default())
    }

    #[must_use]
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./keyward.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("keyward").join("config.toml"));
        }
        paths
    }

    /// Override values from the environment
    ///
    /// Takes a lookup function so callers (and tests) decide where variables
    /// come from. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = get(ENV_BASE_URL) {
            tracing::debug!("Using base URL from {}", ENV_BASE_URL);
            self.api.base_url = base_url;
        }
        if let Some(token) = get(ENV_TOKEN) {
            tracing::debug!("Using token from {}", ENV_TOKEN);
            self.api.token = Some(token);
        }
    }

    /// Settings for the HTTP transport
    #[must_use]
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            base_url: self.api.base_url.clone(),
            token: self.api.token.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
            user_agent: self.api.user_agent.clone(),
        }
    }

    /// Copy safe to print: the token is masked
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.api.token.is_some() {
            copy.api.token = Some("<redacted>".to_string());
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Generate example configuration file
    #[must_use]
    pub fn example() -> String {
        let example = Config::default();
        toml::to_string_pretty(&example).expect("Failed to serialize example config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() -> Result<()> {
        let temp_dir = tempdir()?;
        let config = Config::load(temp_dir.path().join("nope.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_load_partial_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("keyward.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://files.example.com\"\ntoken = \"abc\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.api.base_url, "https://files.example.com");
        assert_eq!(config.api.token.as_deref(), Some("abc"));
        // Unset keys keep their defaults
        assert_eq!(config.api.timeout_secs, 30);
        Ok(())
    }

    #[test]
    fn test_invalid_file_is_an_error() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("keyward.toml");
        std::fs::write(&path, "[api\nbase_url = ")?;

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        Ok(())
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://override.example.com"),
            (ENV_TOKEN, "from-env"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.api.base_url, "https://override.example.com");
        assert_eq!(config.api.token.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.api.token = Some("from-file".to_string());
        config.apply_env(|_| Some("   ".to_string()));

        assert_eq!(config.api.base_url, default_base_url());
        assert_eq!(config.api.token.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_transport_config_mapping() {
        let mut config = Config::default();
        config.api.timeout_secs = 7;
        config.api.token = Some("t".to_string());

        let transport = config.transport_config();
        assert_eq!(transport.timeout, Duration::from_secs(7));
        assert_eq!(transport.token.as_deref(), Some("t"));
        assert_eq!(transport.base_url, config.api.base_url);
    }

    #[test]
    fn test_redacted_hides_token() -> Result<()> {
        let mut config = Config::default();
        config.api.token = Some("super-secret".to_string());

        let shown = config.redacted().to_toml()?;
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("<redacted>"));
        Ok(())
    }

    #[test]
    fn test_example_round_trips() {
        let example = Config::example();
        let parsed: Config = toml::from_str(&example).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
