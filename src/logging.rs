//! Structured logging setup.
//!
//! stdout is reserved for the IPC event stream, so diagnostics go to
//! stderr and to daily-rolling log files.

use std::fs;
use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing.
///
/// - File output: rolling files in `<config>/voicebridge/logs/`, daily
///   rotation, keeping the latest 5 files.
/// - Console output (stderr): human-readable compact format.
/// - Environment filter: defaults to `info`, configurable via `RUST_LOG`.
///
/// If the log directory cannot be created the file layer is skipped and
/// logging continues on stderr alone.
pub fn init() {
    let log_dir = default_log_dir();
    let _ = fs::create_dir_all(&log_dir);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("voicebridge")
        .filename_suffix("log")
        .max_log_files(5)
        .build(&log_dir);

    match file_appender {
        Ok(appender) => {
            let file_layer = fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            let console_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(true)
                .compact();
            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .with(console_layer)
                .init();
        }
        Err(e) => {
            let console_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(true)
                .compact();
            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .init();
            tracing::warn!("Log file appender unavailable: {}", e);
        }
    }

    tracing::info!(log_dir = %log_dir.display(), "Logger initialized");
}

fn default_log_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voicebridge")
        .join("logs")
}
