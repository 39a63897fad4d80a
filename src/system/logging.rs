//! Logging system initialization
//!
//! Sets up the tracing subscriber from `LoggingConfig`: console or file
//! output, optional daily rotation, text or JSON formatting.

use crate::config::LoggingConfig;
use tracing_appender::rolling;
use tracing_subscriber;

/// Initialize the logging system.
///
/// Call once during startup, after configuration has been loaded. The
/// returned `WorkerGuard` must be kept alive for the duration of the
/// program so buffered log writes are flushed.
///
/// # Panics
/// * If creating the log appender fails
/// * If the global subscriber is already set
pub fn init_logging(config: &LoggingConfig) -> tracing_appender::non_blocking::WorkerGuard {
    let writer: Box<dyn std::io::Write + Send + Sync> = if let Some(ref log_file) = config.file {
        if !log_file.is_empty() && config.enable_rotation {
            let dir = std::path::Path::new(log_file)
                .parent()
                .unwrap_or(std::path::Path::new("."));
            let filename = std::path::Path::new(log_file)
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("linktracker.log"));
            let filename_str = filename.to_str().unwrap_or("linktracker.log");
            let appender = rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(filename_str.trim_end_matches(".log"))
                .filename_suffix("log")
                .max_log_files(config.max_backups as usize)
                .build(dir)
                .expect("Failed to create rolling log appender");
            Box::new(appender)
        } else if !log_file.is_empty() {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .expect("Failed to open log file");
            Box::new(file)
        } else {
            Box::new(std::io::stdout())
        }
    } else {
        Box::new(std::io::stdout())
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::new(config.level.clone());

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(config.file.as_ref().is_none_or(|f| f.is_empty()));

    if config.format == "json" {
        subscriber_builder.json().init();
    } else {
        subscriber_builder.init();
    }

    guard
}
