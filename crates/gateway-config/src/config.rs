//! Configuration for the interactions gateway.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default platform API base URL (v10).
pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v10";

const ENV_PUBLIC_KEY: &str = "PUBLIC_KEY";
const ENV_APP_ID: &str = "APP_ID";
const ENV_API_BASE_URL: &str = "API_BASE_URL";

/// Gateway configuration.
///
/// Supplied once at startup; the gateway holds it for process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Hex-encoded Ed25519 public key issued for the application.
    pub public_key: String,
    /// Application id used in follow-up webhook URLs.
    pub app_id: String,
    /// Platform API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl GatewayConfig {
    /// Create a config with the default API base URL.
    pub fn new(public_key: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            app_id: app_id.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// `PUBLIC_KEY` and `APP_ID` are required; `API_BASE_URL` is optional
    /// and falls back to [`DEFAULT_API_BASE_URL`].
    pub fn from_env() -> ConfigResult<Self> {
        let public_key = require_env(ENV_PUBLIC_KEY)?;
        let app_id = require_env(ENV_APP_ID)?;
        let api_base_url = match std::env::var(ENV_API_BASE_URL) {
            Ok(value) if !value.is_empty() => value,
            _ => DEFAULT_API_BASE_URL.to_string(),
        };

        let config = Self {
            public_key,
            app_id,
            api_base_url,
        };
        config.validate()?;
        tracing::debug!(api_base_url = %config.api_base_url, "gateway configuration loaded");
        Ok(config)
    }

    /// Get the API base URL as a parsed URL.
    pub fn api_base_url(&self) -> ConfigResult<Url> {
        Url::parse(&self.api_base_url).map_err(ConfigError::from)
    }

    fn validate(&self) -> ConfigResult<()> {
        Url::parse(&self.api_base_url)?;
        Ok(())
    }
}

fn require_env(name: &'static str) -> ConfigResult<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}
