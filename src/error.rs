// src/error.rs

//! Unified error handling for the digest pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for digest operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
///
/// Every stage propagates these unchanged; none of them is recovered from
/// locally, so any variant reaching the entry point aborts the run.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Forum or email credentials were rejected
    #[error("Authentication failed for {service}: {message}")]
    Authentication { service: String, message: String },

    /// Forum API unreachable or answered with a non-success status
    #[error("Source unavailable ({target}): {message}")]
    SourceUnavailable { target: String, message: String },

    /// Malformed intermediate data reached the formatter
    #[error("Format error: {0}")]
    Format(String),

    /// SMTP connection, timeout, or recipient rejection
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an authentication error for the named service.
    pub fn authentication(service: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Authentication {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// Create a source-unavailable error for an endpoint or community.
    pub fn source_unavailable(target: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::SourceUnavailable {
            target: target.into(),
            message: message.to_string(),
        }
    }

    /// Create a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Create a delivery error.
    pub fn delivery(message: impl fmt::Display) -> Self {
        Self::Delivery(message.to_string())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error was caused by rejected credentials.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
