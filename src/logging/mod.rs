//! Logging setup
//!
//! Installs a `tracing` subscriber for the command line tool and handles the
//! log file location under ~/.config/fontparts/logs/.

use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    Settings::config_dir().join("logs")
}

/// Get the path to the current log file
pub fn current_log_file() -> PathBuf {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d");
    logs_dir().join(format!("fontparts-{}.log", timestamp))
}

/// Initialize the logs directory
pub fn initialize_logs_directory() -> anyhow::Result<()> {
    let logs_dir = logs_dir();
    fs::create_dir_all(&logs_dir)?;
    Ok(())
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `filter` when set. With `log_to_file`, output goes
/// to today's log file instead of stderr; keep the returned guard alive
/// until exit so buffered lines get flushed.
pub fn init_logging(filter: &str, log_to_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(filter))?;

    if log_to_file {
        initialize_logs_directory()?;
        let log_file_path = current_log_file();
        let log_file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file_path)?;
        let (writer, guard) = tracing_appender::non_blocking(log_file);
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_ansi(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;
        tracing::info!(
            "=== fontparts started at {} ===",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );
        return Ok(Some(guard));
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_is_dated() {
        let path = current_log_file();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("fontparts-"));
        assert!(name.ends_with(".log"));
        assert!(path.starts_with(logs_dir()));
    }
}
