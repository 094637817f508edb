//! Logging setup: stdout by default, or an append-only log file when one is
//! configured. The log file is the only observability channel when this
//! program runs from a scheduler.

use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoUtc;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log file path: {0}")]
    InvalidPath(String),
}

/// Guard that must be kept alive to ensure logs are flushed.
///
/// When this guard is dropped, any remaining logs will be flushed to the
/// output. Keep this value alive for the duration of the program.
pub struct LogGuard {
    _guards: Vec<WorkerGuard>,
}

/// Sets up console-only logging (stdout).
pub fn setup_console_logging() -> LogGuard {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_timer(ChronoUtc::rfc_3339())
        .init();

    LogGuard { _guards: vec![] }
}

/// Sets up logging that appends to the given file, with timestamps in UTC
/// and ANSI escapes disabled.
///
/// Returns a guard that must be kept alive for the duration of the program.
pub fn setup_file_logging(path: impl AsRef<Path>) -> Result<LogGuard, LoggingError> {
    let path = path.as_ref();
    let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.display().to_string()))?;

    let appender = tracing_appender::rolling::never(
        directory.unwrap_or_else(|| Path::new(".")),
        file_name,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    Ok(LogGuard {
        _guards: vec![guard],
    })
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_rejects_directory_path() {
        let result = setup_file_logging("/");
        assert!(matches!(result, Err(LoggingError::InvalidPath(_))));
    }
}
