//! Logging Setup
//!
//! Installs the global `tracing` subscriber:
//! - stderr layer, compact and human readable
//! - JSON file layer with daily rotation in the configured log directory
//! - `log` macros forwarded to `tracing`
//!
//! `RUST_LOG` overrides the configured level when set.

use std::fs;
use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Base name of the rolling log file (a `.YYYY-MM-DD` suffix is appended).
pub const LOG_FILE_NAME: &str = "persona-console.log";

/// Filter from `RUST_LOG`, or `default_level` when unset or invalid.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the logging system.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application so buffered file output is flushed on shutdown.
pub fn init(config: &LoggingConfig) -> WorkerGuard {
    let log_dir = config.log_dir();
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter(&config.level));

    // stdout is reserved for command output
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .compact()
        .with_filter(env_filter(&config.level));

    if let Err(e) = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
    {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    // try_init may already have installed the bridge.
    if let Err(e) = tracing_log::LogTracer::init() {
        tracing::debug!("LogTracer not installed: {}", e);
    }

    log::debug!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_NAME)
    );

    guard
}
