//! Error types and handling for the Transifex client
//!
//! Provides structured error types for transport, API and configuration
//! failures with enough context to report them from the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Transifex client operations
pub type Result<T> = std::result::Result<T, TxError>;

/// Error types for Transifex client operations
#[derive(Error, Debug)]
pub enum TxError {
    // ═══════════════════════════════════════════════════════════════
    // Transport Errors
    // ═══════════════════════════════════════════════════════════════
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to connect to the remote server
    #[error("Failed to connect to {host}: {reason}")]
    ConnectionError {
        /// Host (and port) the connection was attempted against
        host: String,
        /// Underlying failure
        reason: String,
    },

    /// The transport lost its connection before the request could be sent
    #[error("Not connected to server")]
    NotConnected,

    /// The server did not answer within the configured timeout
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// The server answered with something that is not an HTTP response
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The URL uses a scheme the selected transport cannot speak
    #[error("Unsupported URL scheme '{scheme}' for the {driver} transport")]
    UnsupportedScheme {
        /// Scheme of the rejected URL
        scheme: String,
        /// Name of the transport that rejected it
        driver: String,
    },

    /// No transport driver could be created
    #[error("No usable HTTP transport: {0}")]
    NoTransport(String),

    // ═══════════════════════════════════════════════════════════════
    // API Errors
    // ═══════════════════════════════════════════════════════════════
    /// The API answered with an unexpected status code
    #[error("Transifex API error: {status} - {message}")]
    ApiError {
        /// HTTP status code returned by the API
        status: u16,
        /// Error message extracted from the response body
        message: String,
    },

    // ═══════════════════════════════════════════════════════════════
    // Configuration & File Errors
    // ═══════════════════════════════════════════════════════════════
    /// Failed to read configuration file
    #[error("Failed to read config from {path}: {reason}")]
    ConfigRead {
        /// Config file path
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// Failed to write configuration file
    #[error("Failed to write config to {path}: {reason}")]
    ConfigWrite {
        /// Config file path
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// File operation failed
    #[error("File operation failed: {path}: {reason}")]
    FileError {
        /// Path of the file
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════
    // Serialization & Input Errors
    // ═══════════════════════════════════════════════════════════════
    /// Failed to serialize data
    #[error("Serialization failed: {0}")]
    SerializationError(String),

    /// Failed to deserialize data
    #[error("Deserialization failed: {0}")]
    DeserializationError(String),

    /// Invalid input argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TxError {
    /// Get the exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 2,
            Self::ConfigRead { .. } | Self::ConfigWrite { .. } | Self::InvalidConfig(_) => 3,
            Self::ConnectionError { .. }
            | Self::Http(_)
            | Self::NotConnected
            | Self::NoTransport(_)
            | Self::UnsupportedScheme { .. } => 4,
            Self::InvalidResponse(_) | Self::DeserializationError(_) => 5,
            Self::ApiError { .. } => 6,
            Self::Timeout(_) => 124,
            _ => 1,
        }
    }

    /// Whether the error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError { .. } | Self::Http(_) | Self::NotConnected | Self::Timeout(_) => {
                true
            }
            Self::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<std::io::Error> for TxError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                Self::Timeout(err.to_string())
            }
            std::io::ErrorKind::NotConnected
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted => Self::NotConnected,
            _ => Self::Http(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for TxError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            Self::DeserializationError(format!("JSON syntax error: {err}"))
        } else {
            Self::DeserializationError(err.to_string())
        }
    }
}

impl From<reqwest::Error> for TxError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionError {
                host: err
                    .url()
                    .and_then(|url| url.host_str().map(str::to_string))
                    .unwrap_or_else(|| "<unknown>".to_string()),
                reason: err.to_string(),
            }
        } else {
            Self::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(TxError::InvalidArgument("x".into()).exit_code(), 2);
        assert_eq!(TxError::NotConnected.exit_code(), 4);
        assert_eq!(
            TxError::ApiError {
                status: 404,
                message: "Not found".into()
            }
            .exit_code(),
            6
        );
        assert_eq!(TxError::Timeout("slow".into()).exit_code(), 124);
        assert_eq!(TxError::Internal("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_retryable() {
        assert!(TxError::Timeout("slow".into()).is_retryable());
        assert!(TxError::ApiError {
            status: 503,
            message: "busy".into()
        }
        .is_retryable());
        assert!(!TxError::ApiError {
            status: 400,
            message: "bad".into()
        }
        .is_retryable());
        assert!(!TxError::InvalidArgument("x".into()).is_retryable());
    }

    #[test]
    fn test_io_error_mapping() {
        let err: TxError = std::io::Error::new(std::io::ErrorKind::TimedOut, "late").into();
        assert!(matches!(err, TxError::Timeout(_)));

        let err: TxError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, TxError::NotConnected));
    }

    #[test]
    fn test_api_error_display() {
        let err = TxError::ApiError {
            status: 500,
            message: "Generic Error".into(),
        };
        assert_eq!(err.to_string(), "Transifex API error: 500 - Generic Error");
    }
}
