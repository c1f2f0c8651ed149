//! Error types for the Aegis console.

use thiserror::Error;

/// A shared error type for the entire console.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone)]
pub enum AegisError {
    /// A backend request failed (connection refused, non-success status,
    /// malformed response body).
    #[error("Backend request failed: {0}")]
    Backend(String),

    /// A bounded operation exceeded its deadline.
    #[error("Operation timed out: {operation}")]
    Timeout { operation: &'static str },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AegisError {
    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates a Timeout error
    pub fn timeout(operation: &'static str) -> Self {
        Self::Timeout { operation }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Backend error
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// Check if this error represents a transient network condition.
    ///
    /// Returns true for `Backend` and `Timeout` errors. These are the
    /// recoverable failures: the metrics pipeline degrades to synthetic
    /// data and the dispatcher surfaces a retryable error message.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Timeout { .. })
    }
}

impl From<std::io::Error> for AegisError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AegisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AegisError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, AegisError>`.
pub type Result<T> = std::result::Result<T, AegisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(AegisError::backend("connection refused").is_transient());
        assert!(AegisError::timeout("metrics poll").is_transient());
        assert!(!AegisError::config("missing url").is_transient());
        assert!(!AegisError::internal("oops").is_transient());
    }

    #[test]
    fn test_display_messages() {
        let err = AegisError::timeout("health probe");
        assert_eq!(err.to_string(), "Operation timed out: health probe");

        let err = AegisError::backend("status 502");
        assert_eq!(err.to_string(), "Backend request failed: status 502");
    }
}
