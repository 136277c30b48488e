//! Error types for SftpCopy
//!
//! This module defines all error types used throughout the application,
//! providing detailed error information for debugging and user feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SftpCopy operations
#[derive(Error, Debug)]
pub enum SftpCopyError {
    /// I/O error during local file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// Path the operation was acting on
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No trust-store entry matched the host
    #[error("no host key found for '{host}' in '{path}'")]
    HostKeyNotFound {
        /// Host name that was looked up
        host: String,
        /// Trust-store file that was scanned
        path: PathBuf,
    },

    /// A matching trust-store entry carried an undecodable key field
    #[error("error parsing host key \"{field}\" for '{host}': {message}")]
    HostKeyParse {
        /// Host name whose entry failed to parse
        host: String,
        /// The offending key field, verbatim
        field: String,
        /// Decoder diagnostic
        message: String,
    },

    /// Network/SSH connection error
    #[error("Connection error to '{host}': {message}")]
    ConnectionError {
        /// Remote host
        host: String,
        /// Transport diagnostic
        message: String,
    },

    /// SSH authentication failed
    #[error("SSH authentication failed for '{user}@{host}': {message}")]
    AuthenticationError {
        /// Remote user
        user: String,
        /// Remote host
        host: String,
        /// Authentication diagnostic
        message: String,
    },

    /// Server presented a host key that differs from the pinned key
    #[error("host key mismatch for '{host}': server key differs from the pinned known_hosts entry")]
    HostKeyMismatch {
        /// Remote host
        host: String,
    },

    /// Remote transfer error
    #[error("Remote transfer error: {0}")]
    RemoteTransferError(String),

    /// Failure while releasing an acquired resource
    #[error("Close error on {resource}: {message}")]
    CloseError {
        /// Label of the resource being released
        resource: String,
        /// Close diagnostic
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SftpCopyError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a connection error
    pub fn connection(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConnectionError {
            host: host.into(),
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(
        user: impl Into<String>,
        host: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::AuthenticationError {
            user: user.into(),
            host: host.into(),
            message: message.into(),
        }
    }

    /// Create a close error
    pub fn close(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CloseError {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Check if this error comes from trust resolution
    pub fn is_trust_error(&self) -> bool {
        matches!(self, Self::HostKeyNotFound { .. } | Self::HostKeyParse { .. })
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::HostKeyNotFound { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for SftpCopy operations
pub type Result<T> = std::result::Result<T, SftpCopyError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| SftpCopyError::io(path, e))
    }
}
