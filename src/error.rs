// src/error.rs

//! Unified error handling for the archive client.

use std::fmt;

use thiserror::Error;

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Unified archive client error type.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Empty or unconstructable request target
    #[error("Bad identifier: '{0}'")]
    BadIdentifier(String),

    /// Upstream answered outside the 200-299 range
    #[error("Unexpected HTTP response code: {0}")]
    UnexpectedResponseCode(u16),

    /// Transport succeeded but returned nothing usable
    #[error("No items were found")]
    NoData,

    /// Body did not match the expected schema
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Search parameters were rejected before sending
    #[error("Bad search parameters: {0}")]
    BadParameters(String),

    /// Search text was empty
    #[error("Query string is empty")]
    EmptyQueryString,

    /// Anything the other variants do not cover
    #[error("Unknown error: {0}")]
    Unknown(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ArchiveError {
    /// Create a bad identifier error.
    pub fn bad_identifier(identifier: impl Into<String>) -> Self {
        Self::BadIdentifier(identifier.into())
    }

    /// Create a decoding error from any displayable detail.
    pub fn decoding(detail: impl fmt::Display) -> Self {
        Self::Decoding(detail.to_string())
    }

    /// Create a bad parameters error.
    pub fn bad_parameters(message: impl Into<String>) -> Self {
        Self::BadParameters(message.into())
    }

    /// Create an unknown error from any displayable detail.
    pub fn unknown(detail: impl fmt::Display) -> Self {
        Self::Unknown(detail.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<reqwest::Error> for ArchiveError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => Self::UnexpectedResponseCode(status.as_u16()),
            None => Self::unknown(error),
        }
    }
}
