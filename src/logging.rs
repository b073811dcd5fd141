//! Tracing initialization for hosts embedding the engine.
//!
//! Stderr logs at the configured level; when file logging is enabled, a
//! session-specific file in the user cache directory additionally captures
//! DEBUG-level diagnostics through a non-blocking writer. Old session logs
//! are removed after the retention window.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use time::macros::format_description;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{self, fmt, prelude::*};

const LOG_RETENTION_DAYS: u64 = 7;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("unable to determine user cache directory")]
    NoCacheDir,
    #[error("log file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Log directory in the user-specific OS cache directory
/// - Linux: ~/.cache/d2-completion-engine/
/// - macOS: ~/Library/Caches/d2-completion-engine/
/// - Windows: %LOCALAPPDATA%\d2-completion-engine\
fn get_log_dir() -> Result<PathBuf, LoggingError> {
    let mut log_dir = dirs::cache_dir().ok_or(LoggingError::NoCacheDir)?;
    log_dir.push("d2-completion-engine");
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }
    Ok(log_dir)
}

/// Remove session log files older than the retention window.
fn cleanup_old_logs(log_dir: &Path) {
    let now = std::time::SystemTime::now();
    let retention = std::time::Duration::from_secs(LOG_RETENTION_DAYS * 24 * 60 * 60);

    if let Ok(entries) = fs::read_dir(log_dir) {
        for entry in entries.flatten() {
            let Ok(metadata) = entry.metadata() else { continue };
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !(name.starts_with("session-") && name.ends_with(".log")) {
                continue;
            }
            if let Ok(modified) = metadata.modified() {
                if let Ok(age) = now.duration_since(modified) {
                    if age > retention {
                        if let Err(e) = fs::remove_file(entry.path()) {
                            eprintln!("Failed to remove old log file {:?}: {}", entry.path(), e);
                        }
                    }
                }
            }
        }
    }
}

/// Initialize logging with a stderr layer and an optional DEBUG-level
/// session file. Returns a guard that must be kept alive for the lifetime
/// of the host; dropping it stops the non-blocking file writer.
///
/// # Arguments
/// * `no_color` - Disable ANSI colors in stderr output
/// * `log_level` - Override log level (otherwise RUST_LOG or "info")
/// * `enable_file_logging` - Write a session log file (disable for tests)
pub fn init_logger(
    no_color: bool,
    log_level: Option<&str>,
    enable_file_logging: bool,
) -> Result<WorkerGuard, LoggingError> {
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::UTC,
        format_description!(
            "[[[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z]"
        ),
    );

    let stderr_filter = match log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer.clone())
        .with_ansi(!no_color)
        .with_filter(stderr_filter);

    if enable_file_logging {
        let log_dir = get_log_dir()?;
        cleanup_old_logs(&log_dir);

        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::parse(
                "[year][month][day]-[hour][minute][second]",
            ).expect("static format description"))
            .map_err(|e| LoggingError::Subscriber(e.to_string()))?;
        let log_path = log_dir.join(format!("session-{}-{}.log", timestamp, std::process::id()));

        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_timer(timer)
            .with_ansi(false)
            .with_filter(tracing_subscriber::EnvFilter::new("debug"));

        let result = tracing_subscriber::registry()
            .with(stderr_layer)
            .with(file_layer)
            .try_init();

        match result {
            Ok(()) => {
                eprintln!("Logging to file: {log_path:?}");
                Ok(guard)
            }
            // A subscriber installed earlier in the host process is fine.
            Err(e) if e.to_string().contains("already been set") => Ok(guard),
            Err(e) => Err(LoggingError::Subscriber(e.to_string())),
        }
    } else {
        let (_, guard) = tracing_appender::non_blocking(std::io::sink());
        let result = tracing_subscriber::registry().with(stderr_layer).try_init();
        match result {
            Ok(()) => Ok(guard),
            Err(e) if e.to_string().contains("already been set") => Ok(guard),
            Err(e) => Err(LoggingError::Subscriber(e.to_string())),
        }
    }
}
