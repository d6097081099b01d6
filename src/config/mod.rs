pub mod app_conf;
pub mod storage_conf;
pub mod gate_conf;
pub mod gemini_conf;
pub mod site_conf;


pub use app_conf::AppConfig;
pub use storage_conf::StorageConfig;
pub use gate_conf::GateConfig;
pub use gemini_conf::GeminiConfig;
pub use site_conf::SiteConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Read an optional numeric environment variable, falling back to `default`.
pub(crate) fn env_number<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            tracing::error!("Invalid {} value: {}", name, raw);
            ConfigError::InvalidValue(format!("Invalid {} value: {}", name, raw))
        }),
        Err(_) => {
            tracing::warn!("{} not set, using default: {}", name, default);
            Ok(default)
        }
    }
}
