//! Session log file
//!
//! The terminal belongs to the editor, so events go to a file only:
//! - Linux: ~/.cache/ty2ini-edit/
//! - macOS: ~/Library/Caches/ty2ini-edit/
//! - Windows: %LOCALAPPDATA%\ty2ini-edit\

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Get the log directory, creating it if needed
fn log_dir() -> io::Result<PathBuf> {
    let cache_dir = dirs::cache_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Unable to determine user cache directory",
        )
    })?;

    let dir = cache_dir.join("ty2ini-edit");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Filter from `--log-level`, else RUST_LOG, else "info"
fn filter(log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Install the file subscriber.
///
/// The returned guard flushes the writer on drop and must live until the
/// editor exits.
pub fn init_logging(log_level: Option<&str>) -> io::Result<(WorkerGuard, PathBuf)> {
    let log_path = log_dir()?.join(format!("session-{}.log", std::process::id()));
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(filter(log_level));

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    Ok((guard, log_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level_wins() {
        assert_eq!(filter(Some("debug")).to_string(), "debug");
        assert_eq!(
            filter(Some("ty2ini_edit=trace")).to_string(),
            "ty2ini_edit=trace"
        );
    }
}
