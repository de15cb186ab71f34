use std::path::Path;
use thiserror::Error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot create log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid log level filter: {0}")]
    Filter(#[from] ParseError),

    #[error("a global subscriber is already installed: {0}")]
    Init(#[from] TryInitError),
}

/// Builds the `EnvFilter`: `RUST_LOG` wins, otherwise `level`.
fn build_filter(level: &str) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))
}

/// # Setup Logging
///
/// Installs the global subscriber:
/// - a console `fmt` layer with targets and ANSI colors,
/// - a JSON `fmt` layer writing to `<log_dir>/<file_prefix>.<date>` through a daily
///   rolling, non-blocking appender.
///
/// The returned `WorkerGuard` flushes the file writer when dropped, so keep it alive
/// in `main` for the lifetime of the process.
///
/// # Errors
/// The log directory cannot be created, `level` is not a valid filter, or a global
/// subscriber was already set.
pub fn setup_logging(
    log_dir: &Path,
    level: &str,
    file_prefix: &str,
) -> Result<WorkerGuard, LoggingError> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = rolling::daily(log_dir, file_prefix);
    let (non_blocking_appender, guard) = non_blocking(file_appender);

    let console_layer = fmt::layer().with_target(true).with_ansi(true);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_appender)
        .json();

    tracing_subscriber::registry()
        .with(build_filter(level)?)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    info!(log_dir = %log_dir.display(), level, "Logging initialized.");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_level() {
        assert!(EnvFilter::try_new("lib_partners=loudest").is_err());
    }

    #[test]
    fn accepts_directive_lists() {
        assert!(EnvFilter::try_new("info,lib_partners=debug").is_ok());
    }

    #[test]
    fn creates_log_dir_and_second_init_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");

        let guard = setup_logging(&log_dir, "info", "test_partners").unwrap();
        assert!(log_dir.is_dir());

        let again = setup_logging(&log_dir, "info", "test_partners");
        assert!(matches!(again, Err(LoggingError::Init(_))));
        drop(guard);
    }
}
