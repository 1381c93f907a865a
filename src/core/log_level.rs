//! Log level definitions
//!
//! Setting a level causes all logs of that level and higher to be emitted;
//! the ones below it are dropped. `SuperInfo` is the highest level and is
//! always emitted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::LoggerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "camelCase")]
pub enum LogLevel {
    /// Logs that go beyond just normal debug messages. A silly log level.
    Trace = 0,
    /// Debug messages used during development.
    Debug = 1,
    /// Informational messages
    #[default]
    Info = 2,
    /// Something bad might have happened and should be investigated, but we can continue.
    Warn = 3,
    /// Something bad happened, but we can continue or recover.
    Error = 4,
    /// Something critical happened that likely had unintended or fatal consequences
    Crit = 5,
    /// Something happened and we must immediately stop
    Fatal = 6,
    /// Really important information that is always logged
    SuperInfo = 7,
}

impl LogLevel {
    /// The wire name used in serialized records and the `DEBUG` variable.
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Crit => "crit",
            LogLevel::Fatal => "fatal",
            LogLevel::SuperInfo => "superInfo",
        }
    }

    /// The uppercase label rendered in text log headers.
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Crit => "CRIT",
            LogLevel::Fatal => "FATAL",
            LogLevel::SuperInfo => "SUPERINFO",
        }
    }

    /// Parse a wire name, falling back to `Debug` on unknown input.
    ///
    /// Used when interpreting `DEBUG` entries, where an unknown level should
    /// turn logging on rather than fail.
    pub fn from_str_lossy(s: &str) -> Self {
        s.parse().unwrap_or(LogLevel::Debug)
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Green,
            LogLevel::Info => Cyan,
            LogLevel::Warn => Red,
            LogLevel::Error => Red,
            LogLevel::Crit => Red,
            LogLevel::Fatal => Red,
            LogLevel::SuperInfo => Cyan,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "crit" => Ok(LogLevel::Crit),
            "fatal" => Ok(LogLevel::Fatal),
            "superInfo" => Ok(LogLevel::SuperInfo),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}
