use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::{env_number, ConfigError};

/// Completion API configuration. The credential itself is supplied by the user at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    /// Transport-level request timeout
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading completion API configuration from environment variables");
        let defaults = GeminiConfig::default();

        let base_url = env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url);
        debug!("Completion API base URL: {}", base_url);
        let model = env::var("GEMINI_MODEL").unwrap_or(defaults.model);
        debug!("Completion model: {}", model);
        let timeout_secs = env_number("GEMINI_TIMEOUT_SECS", defaults.timeout_secs)?;

        let config = GeminiConfig { base_url, model, timeout_secs };
        config.validate()?;
        Ok(config)
    }

    /// Point the client at a local mock server.
    pub fn from_test_env(base_url: &str) -> Self {
        GeminiConfig {
            base_url: base_url.to_string(),
            model: "gemini-pro".to_string(),
            timeout_secs: 5,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            error!("Invalid completion API base URL: {}", self.base_url);
            return Err(ConfigError::ValidationError(
                "GEMINI_BASE_URL must start with http:// or https://".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            error!("Completion model is empty");
            return Err(ConfigError::ValidationError("GEMINI_MODEL cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            error!("Completion timeout is 0");
            return Err(ConfigError::ValidationError("GEMINI_TIMEOUT_SECS must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-pro".to_string(),
            timeout_secs: 30,
        }
    }
}
