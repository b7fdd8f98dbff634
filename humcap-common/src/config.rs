//! Bootstrap configuration loading
//!
//! The service only needs a handful of static settings (listen address,
//! request body limit, logging). They come from a small TOML file resolved
//! in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `HUMCAP_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/humcap/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing platform default file is never fatal: the service starts with
//! defaults. An explicitly requested file that is missing, or any file that
//! cannot be parsed, is an error.

use crate::verification::MAX_RECORDING_BYTES;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "HUMCAP_CONFIG";

/// Default listen host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5780;

/// Default request body limit (6 MiB)
///
/// Must stay above [`MAX_RECORDING_BYTES`] so oversize recordings reach the
/// verification handler and get a structured rejection instead of a 413.
pub const DEFAULT_MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Bootstrap configuration loaded from TOML
///
/// These settings cannot change while the service is running.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Interface to bind the HTTP server to
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }

        if self.max_body_bytes <= MAX_RECORDING_BYTES {
            return Err(Error::Config(format!(
                "max_body_bytes ({}) must exceed the recording size limit ({})",
                self.max_body_bytes, MAX_RECORDING_BYTES
            )));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::Config(format!(
                "invalid log level '{}' (expected one of {:?})",
                self.logging.level, LOG_LEVELS
            )));
        }

        Ok(())
    }

    /// `host:port` string for binding the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Platform default config file location, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("humcap").join("config.toml"))
}

/// Resolve which config file to read
///
/// Returns the path together with whether it was explicitly requested
/// (CLI or environment). Explicit paths must exist; the platform default
/// may be absent.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<(PathBuf, bool)> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some((path.to_path_buf(), true));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some((PathBuf::from(path), true));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().map(|p| (p, false))
}

/// Load bootstrap configuration with graceful fallback to defaults
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    match resolve_config_path(cli_arg) {
        Some((path, true)) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            TomlConfig::load_from_file(&path)
        }
        Some((path, false)) if path.exists() => TomlConfig::load_from_file(&path),
        // Priority 4: Compiled defaults
        _ => Ok(TomlConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TomlConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5780);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:5780");
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn test_partial_toml() {
        let config = TomlConfig::from_toml_str(
            r#"
            port = 9000

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_body_limit_must_exceed_recording_limit() {
        let err = TomlConfig::from_toml_str("max_body_bytes = 5000000").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let err = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"").unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = TomlConfig::from_toml_str("port = \"not a number\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
