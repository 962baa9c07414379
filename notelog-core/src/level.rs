//! Severity levels and name resolution.
//!
//! Callers may pass either a canonical [`LogLevel`] or a free-text name.
//! Both go through [`normalize`], which is the only place names are mapped.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    /// Upper-case name as written in the level field of a log line.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Closest `tracing` level, used for the facility's own diagnostics.
    pub fn as_tracing(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error | LogLevel::Critical => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        normalize(s)
    }
}

/// A level as supplied by a caller: already canonical, or a name to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelInput {
    Canonical(LogLevel),
    Name(String),
}

impl From<LogLevel> for LevelInput {
    fn from(level: LogLevel) -> Self {
        LevelInput::Canonical(level)
    }
}

impl From<&str> for LevelInput {
    fn from(name: &str) -> Self {
        LevelInput::Name(name.to_string())
    }
}

impl From<String> for LevelInput {
    fn from(name: String) -> Self {
        LevelInput::Name(name)
    }
}

/// Resolve any level input to its canonical severity.
///
/// Names are case-insensitive. `"debug"` resolves like the other four names.
pub fn normalize(input: impl Into<LevelInput>) -> Result<LogLevel> {
    match input.into() {
        LevelInput::Canonical(level) => Ok(level),
        LevelInput::Name(name) => match name.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            _ => Err(Error::InvalidLevel(name)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!(normalize("info").unwrap(), LogLevel::Info);
        assert_eq!(normalize("WARNING").unwrap(), LogLevel::Warning);
        assert_eq!(normalize("Error").unwrap(), LogLevel::Error);
        assert_eq!(normalize("cRiTiCaL").unwrap(), LogLevel::Critical);
    }

    #[test]
    fn test_debug_resolves_by_name() {
        assert_eq!(normalize("debug").unwrap(), LogLevel::Debug);
        assert_eq!(normalize("DEBUG").unwrap(), LogLevel::Debug);
    }

    #[test]
    fn test_canonical_passes_through() {
        for level in LogLevel::ALL {
            assert_eq!(normalize(level).unwrap(), level);
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        match normalize("bogus") {
            Err(Error::InvalidLevel(name)) => assert_eq!(name, "bogus"),
            other => panic!("expected InvalidLevel, got {:?}", other),
        }
        assert!(normalize("warn").is_err());
        assert!(normalize("").is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Critical);
    }

    #[test]
    fn test_display_and_from_str() {
        assert_eq!(LogLevel::Critical.to_string(), "CRITICAL");
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
    }

    #[test]
    fn test_tracing_mapping() {
        assert_eq!(LogLevel::Warning.as_tracing(), tracing::Level::WARN);
        assert_eq!(LogLevel::Critical.as_tracing(), tracing::Level::ERROR);
    }
}
