use std::{fmt, str::FromStr};

use crate::logger::error::LoggerError;

/// Verbosity of the daemon's own logs.
///
/// HTTP client and server internals are held at `warn` unless the level is `trace`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoggerLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LoggerLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggerLevel::Error => "error",
            LoggerLevel::Warn => "warn",
            LoggerLevel::Info => "info",
            LoggerLevel::Debug => "debug",
            LoggerLevel::Trace => "trace",
        }
    }

    /// `EnvFilter` directive for this level.
    pub fn directive(&self) -> String {
        match self {
            LoggerLevel::Trace => "trace".to_string(),
            level => format!("{},hyper=warn,reqwest=warn,h2=warn", level.as_str()),
        }
    }
}

impl fmt::Display for LoggerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LoggerLevel::Error),
            "warn" | "warning" => Ok(LoggerLevel::Warn),
            "info" => Ok(LoggerLevel::Info),
            "debug" => Ok(LoggerLevel::Debug),
            "trace" => Ok(LoggerLevel::Trace),
            _ => Err(LoggerError::InvalidLogLevel(s.to_string())),
        }
    }
}
