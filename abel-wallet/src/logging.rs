//! Logging setup for applications embedding the wallet.
//!
//! The library only emits `tracing` events; nothing is printed unless the host
//! installs a subscriber, either its own or the one built here.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::LoggingError;

/// Configuration for logging output.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Log level filter. If None, `RUST_LOG` is read, falling back to INFO.
    pub level: Option<LevelFilter>,
    /// Whether to output logs to stderr.
    pub console: bool,
    /// Append logs to this file as well.
    pub file: Option<PathBuf>,
}

/// Initialize stderr logging at `level`.
pub fn init_console_logging(level: LevelFilter) -> Result<(), LoggingError> {
    init_logging(LoggingConfig {
        level: Some(level),
        console: true,
        file: None,
    })
}

/// Install a global subscriber for `config`.
///
/// With neither console nor file output enabled this is a no-op. Fails if a
/// global subscriber is already installed or the log file cannot be opened.
pub fn init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    if !config.console && config.file.is_none() {
        return Ok(());
    }

    let env_filter = match config.level {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(LevelFilter::INFO.to_string())),
    };

    let file_layer = match config.file {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(dir).map_err(|e| LoggingError::SubscriberInit(e.to_string()))?;
            }
            let file = File::options()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| LoggingError::SubscriberInit(format!("{}: {}", path.display(), e)))?;
            Some(fmt::layer().with_target(true).with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };
    let console_layer = config.console.then(|| fmt::layer().with_target(true).with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggingError::SubscriberInit(e.to_string()))
}
