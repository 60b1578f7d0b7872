//! Error types for dnsync
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

use crate::model::RecordType;

/// Result type alias for dnsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dnsync
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing passwords, bad zone names, ...)
    #[error("{0}")]
    Config(String),

    /// The provider rejected our credentials for a zone
    #[error("{provider} unauthorized for zone: {zone}")]
    Unauthorized {
        /// Provider display name
        provider: String,
        /// Zone name without trailing dot
        zone: String,
    },

    /// The provider returned a record value we cannot trust
    #[error("Unable to parse {record_type} data")]
    MalformedData {
        /// Record type being normalised
        record_type: RecordType,
        /// Offending raw value
        value: String,
    },

    /// A single add/delete command was refused by the provider
    #[error("{provider} could not action command: {zone} {command}")]
    CommandRejected {
        /// Provider display name
        provider: String,
        /// Zone name without trailing dot
        zone: String,
        /// The command line that was refused
        command: String,
        /// HTTP status returned for the command
        status: u16,
    },

    /// A record type the provider cannot manage
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// HTTP client errors (from provider APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors (reading desired-state files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authorization error for a zone
    pub fn unauthorized(provider: impl Into<String>, zone: impl Into<String>) -> Self {
        Self::Unauthorized {
            provider: provider.into(),
            zone: zone.into(),
        }
    }

    /// Create a malformed-data error for a raw value
    pub fn malformed(record_type: RecordType, value: impl Into<String>) -> Self {
        Self::MalformedData {
            record_type,
            value: value.into(),
        }
    }

    /// Create a rejected-command error
    pub fn command_rejected(
        provider: impl Into<String>,
        zone: impl Into<String>,
        command: impl Into<String>,
        status: u16,
    ) -> Self {
        Self::CommandRejected {
            provider: provider.into(),
            zone: zone.into(),
            command: command.into(),
            status,
        }
    }

    /// Create an unsupported-record error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error came from data the provider sent back, as opposed
    /// to configuration or transport problems.
    pub fn is_malformed_data(&self) -> bool {
        matches!(self, Self::MalformedData { .. })
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
