//! Shared logging setup for gifgate binaries.

mod rolling;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use rolling::SharedRollingWriter;

const DEFAULT_LOG_FILTER: &str = "gifgate=info,gifgate_gif=warn";
const MAX_LOG_FILES: usize = 5;
const MAX_LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Logging configuration shared by gifgate binaries.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    /// Mirror the file filter on stderr instead of warnings only.
    pub verbose: bool,
    /// stdout carries a JSON document; keep the console quiet.
    pub json_mode: bool,
}

/// Initialize tracing with a rolling file writer and stderr output.
///
/// If the log directory cannot be prepared the file layer is skipped and a
/// warning goes to stderr; console logging still works.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let console_filter = if config.json_mode {
        EnvFilter::new("warn")
    } else if config.verbose {
        file_filter.clone()
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gifgate=warn"))
    };

    let file_layer = match open_file_writer(config.app_name) {
        Ok(writer) => Some(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(file_filter),
        ),
        Err(err) => {
            eprintln!("Warning: file logging disabled: {:#}", err);
            None
        }
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

fn open_file_writer(app_name: &str) -> Result<SharedRollingWriter> {
    let log_dir = ensure_logs_dir().context("Failed to ensure log directory")?;
    SharedRollingWriter::new(log_dir, app_name, MAX_LOG_FILES, MAX_LOG_FILE_SIZE)
        .with_context(|| format!("Failed to open log file for {}", app_name))
}

/// Get the gifgate home directory: ~/.gifgate (or `GIFGATE_HOME`).
pub fn gifgate_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("GIFGATE_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .map(|home| home.join(".gifgate"))
        .unwrap_or_else(|| PathBuf::from(".gifgate"))
}

/// Get the logs directory: ~/.gifgate/logs
pub fn logs_dir() -> PathBuf {
    gifgate_home().join("logs")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}
