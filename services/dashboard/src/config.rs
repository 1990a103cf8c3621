//! Dashboard configuration (env-driven).

use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};

/// Default request body cap for uploads (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Default number of uploaded rosters kept in memory.
pub const DEFAULT_MAX_SESSIONS: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the dashboard listens on.
    pub listen_addr: SocketAddr,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    pub log_level: String,

    /// Side-channel text log recording uploads and errors.
    pub log_file: PathBuf,

    /// Largest accepted request body.
    pub max_upload_bytes: usize,

    /// Uploaded rosters kept in memory before the oldest is dropped.
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            log_level: "info".to_string(),
            log_file: PathBuf::from("allocation.log"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let listen_addr = lookup("ADVIS_LISTEN_ADDR")
            .map(|v| v.parse())
            .transpose()
            .context("ADVIS_LISTEN_ADDR must be a socket address such as 0.0.0.0:8501.")?
            .unwrap_or(defaults.listen_addr);

        let log_level = lookup("ADVIS_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_file = lookup("ADVIS_LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        let max_upload_bytes: usize = lookup("ADVIS_MAX_UPLOAD_BYTES")
            .map(|v| v.parse())
            .transpose()
            .context("ADVIS_MAX_UPLOAD_BYTES must be an integer (bytes).")?
            .unwrap_or(defaults.max_upload_bytes)
            .max(1024);

        let max_sessions: usize = lookup("ADVIS_MAX_SESSIONS")
            .map(|v| v.parse())
            .transpose()
            .context("ADVIS_MAX_SESSIONS must be an integer.")?
            .unwrap_or(defaults.max_sessions)
            .clamp(1, 4096);

        Ok(Self {
            listen_addr,
            log_level,
            log_file,
            max_upload_bytes,
            max_sessions,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:8501");
        assert_eq!(config.log_file, PathBuf::from("allocation.log"));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("ADVIS_LISTEN_ADDR", "0.0.0.0:9000"),
            ("ADVIS_LOG_FILE", "/var/log/advis.log"),
            ("ADVIS_MAX_SESSIONS", "100000"),
            ("ADVIS_MAX_UPLOAD_BYTES", "10"),
        ])
        .unwrap();
        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.log_file, PathBuf::from("/var/log/advis.log"));
        assert_eq!(config.max_sessions, 4096);
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("ADVIS_LISTEN_ADDR", "nope")]).is_err());
        assert!(config_from(&[("ADVIS_MAX_SESSIONS", "many")]).is_err());
    }
}
