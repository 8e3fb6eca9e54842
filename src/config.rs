//! Runtime configuration, loaded from an optional TOML file.

use crate::application::verifier::ProcessingPoll;
use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Route the "go to dashboard" action points at.
    #[serde(default = "default_dashboard_route")]
    pub dashboard_route: String,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub processing_poll: PollConfig,
}

/// Payment gateway client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_api_base")]
    pub api_base: String,

    /// Publishable (client-side) key. Required.
    #[serde(default)]
    pub publishable_key: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Institute backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the REST API, e.g. `https://api.example.edu/api`. Required.
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub auth_token: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Re-poll policy for intents that are still processing. Off by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default)]
    pub attempts: u32,

    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_dashboard_route() -> String {
    "/fees".to_string()
}

fn default_gateway_api_base() -> String {
    "https://api.stripe.com".to_string()
}

const fn default_timeout_ms() -> u64 {
    15_000
}

const fn default_poll_interval_ms() -> u64 {
    2_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dashboard_route: default_dashboard_route(),
            gateway: GatewayConfig::default(),
            backend: BackendConfig::default(),
            processing_poll: PollConfig::default(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base: default_gateway_api_base(),
            publishable_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth_token: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            attempts: 0,
            interval_ms: default_poll_interval_ms(),
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl PollConfig {
    pub fn policy(&self) -> ProcessingPoll {
        ProcessingPoll {
            attempts: self.attempts,
            interval: Duration::from_millis(self.interval_ms),
        }
    }
}

impl Config {
    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CheckoutError::Config(e.to_string()))
    }

    /// Checks the settings that have no usable default.
    pub fn validate(&self) -> Result<()> {
        if self.gateway.publishable_key.trim().is_empty() {
            return Err(CheckoutError::Config(
                "gateway publishable key is not set".to_string(),
            ));
        }
        if self.gateway.api_base.trim().is_empty() {
            return Err(CheckoutError::Config(
                "gateway api base is empty".to_string(),
            ));
        }
        if self.backend.base_url.trim().is_empty() {
            return Err(CheckoutError::Config(
                "backend base url is not set".to_string(),
            ));
        }
        if self.gateway.timeout_ms == 0 || self.backend.timeout_ms == 0 {
            return Err(CheckoutError::Config(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
