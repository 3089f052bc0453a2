//! File logging for the binary.
//!
//! Logs go to a daily-rolling file so they never interleave with shell
//! output. `RUST_LOG` overrides the default `info` level.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "teamfinder.log";

/// Installs the global subscriber writing under `logs_dir`.
///
/// Returns the writer guard, or `None` when the directory cannot be created
/// (logging is then disabled).
pub fn init(logs_dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(logs_dir) {
        eprintln!(
            "Failed to create log directory {}: {}, logging disabled",
            logs_dir.display(),
            e
        );
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    if installed.is_err() {
        return None;
    }
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_logs_dir() {
        let temp = tempfile::tempdir().unwrap();
        let logs_dir = temp.path().join("state").join("logs");

        let _guard = init(&logs_dir);
        assert!(logs_dir.is_dir());
    }
}
