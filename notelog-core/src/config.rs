//! Instrumentation configuration and path helpers
//!
//! The file sink always lives in a per-user dotfile directory:
//! - Log directory: `~/.BAC0/`
//! - Log file: `~/.BAC0/BAC0.log`
//!
//! Configuration is never loaded implicitly. Host applications that want a
//! TOML file call [`InstrumentationConfig::load_from`] themselves.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the per-user log directory under the home directory
pub const LOG_DIR_NAME: &str = ".BAC0";

/// Name of the log file inside [`LOG_DIR_NAME`]
pub const LOG_FILE_NAME: &str = "BAC0.log";

/// Returns a best-effort home directory path.
pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns `~/.BAC0`
pub fn default_log_dir() -> PathBuf {
    home_dir().join(LOG_DIR_NAME)
}

/// Returns `~/.BAC0/BAC0.log`
pub fn default_log_path() -> PathBuf {
    default_log_dir().join(LOG_FILE_NAME)
}

/// Verbosity override a host type may declare.
///
/// Without one, both sinks are leveled at WARNING.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DebugLevel {
    Debug,
    Info,
}

impl std::str::FromStr for DebugLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(DebugLevel::Debug),
            "info" => Ok(DebugLevel::Info),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

/// Standard stream the console sink writes to
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    #[default]
    Stderr,
    Stdout,
}

/// Per-type instrumentation configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct InstrumentationConfig {
    /// Optional "debug" / "info" override for both sinks
    #[serde(default)]
    pub debug_level: Option<DebugLevel>,

    /// Override for the log directory (defaults to `~/.BAC0`)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Console stream
    #[serde(default)]
    pub console: ConsoleStream,

    /// Diagnostics subscriber configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration for the facility's own `tracing` diagnostics
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_diagnostics_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_diagnostics_level(),
        }
    }
}

fn default_diagnostics_level() -> String {
    "warn".to_string()
}

impl InstrumentationConfig {
    /// Config carrying only a debug-level override
    pub fn with_debug_level(level: DebugLevel) -> Self {
        Self {
            debug_level: Some(level),
            ..Default::default()
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        Self::from_toml_str(&content)
    }

    /// Directory the file sink is created in
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(default_log_dir)
    }

    /// Full path of the log file
    pub fn log_path(&self) -> PathBuf {
        self.log_dir().join(LOG_FILE_NAME)
    }
}
