//! # Logging
//!
//! Installs the global `tracing` subscriber from a [`LoggingConfig`].
//!
//! `RUST_LOG` takes precedence over the configured level when it is set, so operators can turn
//! on `mhf_protocol=debug` for frame-level detail without editing the config file.

use crate::config::LoggingConfig;
use crate::error::{constants, ProtocolError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_ascii_lowercase()))
}

/// Install a global subscriber according to `config`.
///
/// Fails with [`ProtocolError::ConfigError`] if the config is invalid, the log file cannot be
/// opened, or a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    if let Some(msg) = config.validate().into_iter().next() {
        return Err(ProtocolError::ConfigError(msg));
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true);

    let result = match (config.log_to_file, &config.log_file_path) {
        (true, Some(path)) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    ProtocolError::ConfigError(format!("Failed to open log file {path}: {e}"))
                })?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            if config.json_format {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        _ => {
            if config.json_format {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
    };

    result.map_err(|_| ProtocolError::ConfigError(constants::ERR_LOGGING_ALREADY_SET.to_string()))?;

    tracing::info!(app = %config.app_name, level = %config.log_level, "Logging initialised");
    Ok(())
}
