use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{Result, TrackerError};
use crate::fetcher::DEFAULT_QUOTE_ASSET;
use crate::window::WindowMode;

pub const DEFAULT_CONFIG_PATH: &str = "config/tracker.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub mode: WindowMode,
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Only request history for assets with a non-zero balance
    #[serde(default)]
    pub held_assets_only: bool,
}

fn default_quote_asset() -> String {
    DEFAULT_QUOTE_ASSET.to_string()
}

fn default_api_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_recv_window_ms() -> u64 {
    5000
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            mode: WindowMode::default(),
            quote_asset: default_quote_asset(),
            api_url: default_api_url(),
            recv_window_ms: default_recv_window_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            held_assets_only: false,
        }
    }
}

impl TrackerConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: TrackerConfig = serde_yaml::from_str(content)
            .map_err(|e| TrackerError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.quote_asset.trim().is_empty() {
            return Err(TrackerError::InvalidConfiguration(
                "quote_asset cannot be empty".to_string(),
            ));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(TrackerError::InvalidConfiguration(format!(
                "api_url '{}' must start with http:// or https://",
                self.api_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(TrackerError::InvalidConfiguration(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply command-line values on top of the file values, then re-validate.
    pub fn apply_overrides(&mut self, mode: Option<&str>, quote: Option<&str>) -> Result<()> {
        if let Some(mode) = mode {
            self.mode = mode.parse()?;
        }
        if let Some(quote) = quote {
            self.quote_asset = quote.trim().to_uppercase();
        }
        self.validate()
    }
}

/// Load the tracker config from a YAML file.
pub fn load_tracker_config(path: impl AsRef<Path>) -> Result<TrackerConfig> {
    let content = fs::read_to_string(path)?;
    TrackerConfig::from_yaml_str(&content)
}

/// Load an explicitly given path strictly; without one, fall back to
/// [`DEFAULT_CONFIG_PATH`] or defaults when that file is absent.
pub fn resolve_tracker_config(path: Option<&str>) -> Result<TrackerConfig> {
    match path {
        Some(path) => load_tracker_config(path),
        None => load_tracker_config_or_default(DEFAULT_CONFIG_PATH),
    }
}

/// Load `path` when it exists, defaults otherwise.
pub fn load_tracker_config_or_default(path: impl AsRef<Path>) -> Result<TrackerConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_tracker_config(path)
    } else {
        log::debug!("No config at {}, using defaults", path.display());
        Ok(TrackerConfig::default())
    }
}
