//! Error types for puter-demo
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for puter-demo operations
///
/// Covers configuration loading, remote capability calls, session
/// management rules, and local persistence.
#[derive(Error, Debug)]
pub enum DemoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote capability call failed (network, service, or envelope error)
    #[error("{0}")]
    Client(String),

    /// Authentication errors (e.g., 401 Unauthorized)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// No auth token available for the HTTP client
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// File picker could not produce a selection
    #[error("Picker error: {0}")]
    Picker(String),

    /// Session id did not match any stored session
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Refused to delete the only remaining session
    #[error("Cannot delete the last remaining conversation")]
    LastSession,

    /// Durable store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for puter-demo operations
///
/// Uses `anyhow::Error` so call sites can attach context while still
/// carrying a [`DemoError`] that callers may downcast to.
pub type Result<T> = anyhow::Result<T>;

/// Human-readable message of an error, including any attached context
pub fn error_message(err: &anyhow::Error) -> String {
    format!("{:#}", err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_includes_context() {
        let err = anyhow::Error::from(DemoError::Client("timed out".to_string()))
            .context("Reading /demo.txt");
        assert_eq!(error_message(&err), "Reading /demo.txt: timed out");
    }

    #[test]
    fn test_config_error_display() {
        let error = DemoError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_client_error_display_is_bare_message() {
        let error = DemoError::Client("service unavailable".to_string());
        assert_eq!(error.to_string(), "service unavailable");
    }

    #[test]
    fn test_authentication_error_display() {
        let error = DemoError::Authentication("token expired".to_string());
        assert_eq!(error.to_string(), "Authentication error: token expired");
    }

    #[test]
    fn test_last_session_error_display() {
        assert_eq!(
            DemoError::LastSession.to_string(),
            "Cannot delete the last remaining conversation"
        );
    }

    #[test]
    fn test_session_not_found_display() {
        let error = DemoError::SessionNotFound("01ABC".to_string());
        assert_eq!(error.to_string(), "Session not found: 01ABC");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: DemoError = io_error.into();
        assert!(matches!(error, DemoError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: DemoError = json_error.into();
        assert!(matches!(error, DemoError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: DemoError = yaml_error.into();
        assert!(matches!(error, DemoError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DemoError>();
    }
}
