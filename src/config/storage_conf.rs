use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Local storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one file per storage key
    pub data_dir: PathBuf,
    /// Key of the quote snapshot
    pub database_key: String,
    /// Key of the chat relay credential
    pub credential_key: String,
}

impl StorageConfig {
    /// Load storage configuration from environment variables
    ///
    /// Expected environment variables:
    /// - DATA_DIR: storage directory (defaults to `data`)
    /// - DATABASE_KEY: quote snapshot key (defaults to `ronitech_database`)
    /// - CHAT_CREDENTIAL_KEY: chat credential key (defaults to `gemini_api_key`)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading storage configuration from environment variables");
        let defaults = StorageConfig::default();

        let data_dir = env::var("DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| {
            warn!("DATA_DIR not set, using default: {}", defaults.data_dir.display());
            defaults.data_dir.clone()
        });
        debug!("Storage directory: {}", data_dir.display());

        let database_key = env::var("DATABASE_KEY").unwrap_or_else(|_| defaults.database_key.clone());
        debug!("Quote snapshot key: {}", database_key);

        let credential_key = env::var("CHAT_CREDENTIAL_KEY").unwrap_or_else(|_| defaults.credential_key.clone());
        debug!("Chat credential key: {}", credential_key);

        let config = StorageConfig { data_dir, database_key, credential_key };
        config.validate()?;
        info!("Storage configuration loaded successfully");
        Ok(config)
    }

    /// Create StorageConfig for testing
    pub fn from_test_env() -> Self {
        StorageConfig {
            data_dir: env::temp_dir().join("ronitech-site-test"),
            database_key: "test_database".to_string(),
            credential_key: "test_credential".to_string(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            error!("Storage directory is empty");
            return Err(ConfigError::ValidationError("DATA_DIR cannot be empty".to_string()));
        }
        for (name, key) in [("DATABASE_KEY", &self.database_key), ("CHAT_CREDENTIAL_KEY", &self.credential_key)] {
            let valid = !key.is_empty()
                && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid {
                error!("{} is not a valid storage key: {}", name, key);
                return Err(ConfigError::ValidationError(format!(
                    "{} must be non-empty and use only letters, digits, '_' or '-'",
                    name
                )));
            }
        }
        if self.database_key == self.credential_key {
            error!("Quote snapshot and credential share one key");
            return Err(ConfigError::ValidationError(
                "DATABASE_KEY and CHAT_CREDENTIAL_KEY must differ".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: PathBuf::from("data"),
            database_key: "ronitech_database".to_string(),
            credential_key: "gemini_api_key".to_string(),
        }
    }
}
