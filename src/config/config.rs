// src/config/config.rs
use crate::utils::error::MinerError;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Main configuration structure for the miner client
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Mine on testnet; only changes what the console displays
    #[serde(default)]
    pub testnet: bool,

    /// Pool to mine against (e.g., "stratum+tcp://pool.example.com:10300")
    #[serde(default)]
    pub pool_url: String,

    /// Log level: off, error, warn, info, debug or trace
    /// (default: info; `RUST_LOG` takes precedence)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Stats API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Settings for the `miner_getstat1` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Whether to serve the stats API
    #[serde(default)]
    pub enabled: bool,

    /// Listen address (default: 127.0.0.1:8989)
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_listen() -> String {
    "127.0.0.1:8989".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            enabled: false,
            listen: default_listen(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            testnet: false,
            pool_url: String::new(),
            log_level: default_log_level(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(MinerError)` - If file couldn't be read or parsed
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MinerError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            MinerError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&config_str)
    }

    /// Parses configuration from TOML text
    pub fn parse(text: &str) -> Result<Self, MinerError> {
        toml::from_str(text)
            .map_err(|e| MinerError::ConfigError(format!("Invalid config format: {}", e)))
    }

    /// Checks values that serde cannot
    ///
    /// # Errors
    /// * `UrlError` - pool URL is set but not a valid URL
    /// * `ConfigError` - unknown log level, or API enabled without a listen address
    pub fn validate(&self) -> Result<(), MinerError> {
        if !self.pool_url.is_empty() {
            Url::parse(&self.pool_url)?;
        }
        self.log_filter()?;
        if self.api.enabled && self.api.listen.trim().is_empty() {
            return Err(MinerError::ConfigError(
                "api.listen must be set when the API is enabled".into(),
            ));
        }
        Ok(())
    }

    /// The configured log level
    pub fn log_filter(&self) -> Result<LevelFilter, MinerError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| MinerError::ConfigError(format!("Invalid log level: {}", self.log_level)))
    }

    /// Generates a configuration template string
    ///
    /// # Returns
    /// String containing a commented TOML configuration template
    pub fn generate_template() -> String {
        let mut template = String::new();
        template.push_str("# DERO Miner Configuration\n\n");
        template.push_str("# Pool URL, e.g. stratum+tcp://pool.example.com:10300\n");
        template.push_str("pool_url = \"\"\n");
        template.push_str("# Mark the console prompt as testnet\n");
        template.push_str("testnet = false\n");
        template.push_str("# off, error, warn, info, debug, trace (RUST_LOG overrides)\n");
        template.push_str("log_level = \"info\"\n\n");
        template.push_str("# miner_getstat1 stats API (JSON-RPC over HTTP)\n");
        template.push_str("[api]\n");
        template.push_str("enabled = false\n");
        template.push_str("listen = \"127.0.0.1:8989\"\n");
        template
    }
}
