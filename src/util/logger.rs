use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use tracing_appender::{non_blocking, rolling};


pub struct Logger {
    pub guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
}

/// Directory and file prefix of each rolling log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFiles {
    pub general: (String, String),
    pub error: (String, String),
    pub general_json: (String, String),
    pub error_json: (String, String),
}

impl LogFiles {
    pub fn under(log_dir: &str) -> Self {
        let error_dir = format!("{}/error", log_dir);
        LogFiles {
            general: (log_dir.to_string(), "ronitech-site.log".to_string()),
            error: (error_dir.clone(), "ronitech-site-error.log".to_string()),
            general_json: (format!("{}/json", log_dir), "ronitech-site.json".to_string()),
            error_json: (format!("{}/json", error_dir), "ronitech-site-error.json".to_string()),
        }
    }
}

impl Logger {
    pub fn new () -> Result<Self, Box<dyn std::error::Error>> {
        let guards = Self::setup_logging()?;
        Ok(Logger { guards })
    }


    pub fn setup_logging() -> Result<Vec<tracing_appender::non_blocking::WorkerGuard>, Box<dyn std::error::Error>> {
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
        let files = LogFiles::under(&log_dir);
        for dir in [&files.general_json.0, &files.error_json.0] {
            std::fs::create_dir_all(dir)?;
        }

        let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ronitech_site=debug"));

        let file_log_level = std::env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());

        let error_file_log_level = std::env::var("ERROR_FILE_LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        // File appenders
        let general_file = rolling::daily(&files.general.0, &files.general.1);
        let (non_blocking_general, general_guard) = non_blocking(general_file);

        let error_file = rolling::daily(&files.error.0, &files.error.1);
        let (non_blocking_error, error_guard) = non_blocking(error_file);

        let general_json_file = rolling::daily(&files.general_json.0, &files.general_json.1);
        let (non_blocking_json, json_guard) = non_blocking(general_json_file);

        let error_json_file = rolling::daily(&files.error_json.0, &files.error_json.1);
        let (non_blocking_error_json, error_json_guard) = non_blocking(error_json_file);

        tracing_subscriber::registry()
            .with(
                // Console output - pretty format for development
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_ansi(true)
                    .with_filter(console_filter)
            )
            .with(
                fmt::layer()
                    .with_writer(non_blocking_general)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(file_log_level.clone()))
            )
            .with(
                fmt::layer()
                    .with_writer(non_blocking_error)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(error_file_log_level.clone()))
            )
            .with(
                fmt::layer()
                    .json()
                    .with_writer(non_blocking_json)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(file_log_level))
            )
            .with(
                fmt::layer()
                    .json()
                    .with_writer(non_blocking_error_json)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(error_file_log_level))
            )
            .try_init()?;

        // Guards keep the background writer threads alive
        Ok(vec![general_guard, error_guard, json_guard, error_json_guard])
    }
}
