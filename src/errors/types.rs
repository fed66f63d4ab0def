//! Error type definitions for the contest-hub application
//!
//! This module defines all error types used throughout the application,
//! providing a hierarchical error system that makes debugging and error
//! handling more straightforward.

use std::fmt;
use thiserror::Error;

/// Top-level application error type
///
/// This enum represents all possible errors that can occur in the application.
/// It uses `thiserror` to provide automatic error trait implementations and
/// proper error chaining.
#[derive(Error, Debug)]
pub enum AppError {
    /// Source handling errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Resource not found errors
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Source handling specific errors
///
/// Covers everything that can go wrong while talking to one upstream
/// (a contest listing API or a video playlist API). These never escape the
/// aggregation layer: a failed source degrades to an empty contribution.
#[derive(Debug)]
pub enum SourceError {
    /// Network connection timeouts
    Timeout { url: String },

    /// HTTP errors from external sources
    Http { status: u16, message: String },

    /// Upstream answered 200 but rejected the request at the payload level
    UpstreamRejected { source: String, message: String },

    /// Parsing errors for source data
    ParseError { source: String, message: String },
}

// Implemented by hand rather than derived: the `source` fields hold the
// upstream platform name, which thiserror would otherwise treat as an
// error-source chain and require to implement `std::error::Error`.
impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { url } => write!(f, "Connection timeout: {url}"),
            Self::Http { status, message } => write!(f, "HTTP error: {status} - {message}"),
            Self::UpstreamRejected { source, message } => {
                write!(f, "Upstream rejected: {source} - {message}")
            }
            Self::ParseError { source, message } => {
                write!(f, "Parse error: {source} - {message}")
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Create a timeout error
    pub fn timeout<U: Into<String>>(url: U) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Create an upstream rejection error
    pub fn upstream_rejected<S: Into<String>, M: Into<String>>(source: S, message: M) -> Self {
        Self::UpstreamRejected {
            source: source.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error<S: Into<String>, M: Into<String>>(source: S, message: M) -> Self {
        Self::ParseError {
            source: source.into(),
            message: message.into(),
        }
    }

    /// Classify a reqwest failure against the URL that was being fetched
    pub fn from_request(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Http {
                status: 0,
                message: err.to_string(),
            }
        }
    }
}
