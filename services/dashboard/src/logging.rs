//! Logging initialization.
//!
//! Records go to stderr and, as plain text, to the side-channel log file
//! configured by `ADVIS_LOG_FILE`.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Opens the log file for appending, creating parent directories as needed.
///
/// Earlier runs are kept; the log is never truncated.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber (prefer RUST_LOG, fallback to ADVIS_LOG_LEVEL).
pub fn init(config: &Config) -> anyhow::Result<()> {
    let file = open_log_file(&config.log_file)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_log_file_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("allocation.log");

        let mut first = open_log_file(&path).unwrap();
        writeln!(first, "first run").unwrap();
        drop(first);

        let mut second = open_log_file(&path).unwrap();
        writeln!(second, "second run").unwrap();
        drop(second);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first run\nsecond run\n");
    }

    #[test]
    fn test_bare_file_name_needs_no_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("allocation.log");
        assert!(open_log_file(&path).is_ok());
    }
}
