use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::{env_number, ConfigError};

/// Admin console gate configuration.
///
/// The code ships with the program, so anyone holding the binary or the `.env` can read
/// it. It only hides the console from casual visitors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    pub code: String,
    pub max_attempts: u32,
    pub lockout_secs: u64,
}

impl GateConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading admin gate configuration from environment variables");
        let defaults = GateConfig::default();

        let code = env::var("ADMIN_GATE_CODE").unwrap_or_else(|_| {
            warn!("ADMIN_GATE_CODE not set, using the built-in code");
            defaults.code.clone()
        });
        let max_attempts = env_number("ADMIN_GATE_MAX_ATTEMPTS", defaults.max_attempts)?;
        let lockout_secs = env_number("ADMIN_GATE_LOCKOUT_SECS", defaults.lockout_secs)?;

        let config = GateConfig { code, max_attempts, lockout_secs };
        config.validate()?;
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        GateConfig { code: "RONITECH2025".to_string(), max_attempts: 3, lockout_secs: 2 }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.code.trim().is_empty() {
            error!("Admin gate code is empty");
            return Err(ConfigError::ValidationError("ADMIN_GATE_CODE cannot be empty".to_string()));
        }
        if self.code != self.code.to_uppercase() {
            error!("Admin gate code has lowercase letters");
            return Err(ConfigError::ValidationError(
                "ADMIN_GATE_CODE must be upper case, submitted codes are upper-cased".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            error!("Admin gate max attempts is 0");
            return Err(ConfigError::ValidationError("ADMIN_GATE_MAX_ATTEMPTS must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn lockout(&self) -> Duration {
        Duration::from_secs(self.lockout_secs)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig::from_test_env()
    }
}
