//! Error types for the logging facility
//!
//! Only configuration and serialization can fail. The stack subsystem has no
//! error type at all: a frame that does not parse is `None`, and empty trace
//! input is `None`, since stack traces are inherently variable text and
//! best-effort resilience beats strict validation there.

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A level string did not name any known log level
    #[error("Invalid log level: '{0}'")]
    InvalidLogLevel(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an invalid log level error
    pub fn invalid_level(level: impl Into<String>) -> Self {
        LoggerError::InvalidLogLevel(level.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::invalid_level("loud");
        assert!(matches!(err, LoggerError::InvalidLogLevel(_)));

        let err = LoggerError::config("Log", "namespace may not be empty");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::invalid_level("loud");
        assert_eq!(err.to_string(), "Invalid log level: 'loud'");

        let err = LoggerError::config("Log", "namespace may not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for Log: namespace may not be empty"
        );
    }
}
