use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::config::{env_number, ConfigError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// How long the intake form shows its confirmation before resetting
    pub confirmation_secs: u64,
    /// Optional JSON file with the gallery catalogue
    pub gallery_path: Option<PathBuf>,
}

impl SiteConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let confirmation_secs = env_number("INTAKE_CONFIRMATION_SECS", 3u64)?;
        let gallery_path = env::var("GALLERY_PATH").ok().map(PathBuf::from);
        debug!(?gallery_path, "Gallery catalogue path");
        Ok(SiteConfig { confirmation_secs, gallery_path })
    }

    pub fn confirmation(&self) -> Duration {
        Duration::from_secs(self.confirmation_secs)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig { confirmation_secs: 3, gallery_path: None }
    }
}
