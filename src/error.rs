// src/error.rs

//! Unified error handling for the search trigger.

use std::fmt;

use thiserror::Error;

/// Result type alias for foundarr operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid configuration value
    #[error("{0}")]
    Config(String),

    /// Server answered with a non-success status
    #[error("{context} failed ({status}): {url}")]
    Status {
        context: &'static str,
        status: u16,
        url: String,
    },

    /// Network-level failure or undecodable body
    #[error("{context} failed: {source}")]
    Request {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP client construction failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Listing payload did not have the expected shape
    #[error("Unexpected response from {path}: {message}")]
    UnexpectedResponse { path: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a request error tagged with the operation that issued it.
    pub fn request(context: &'static str, source: reqwest::Error) -> Self {
        Self::Request { context, source }
    }

    /// Create a status error tagged with the operation that issued it.
    pub fn status(context: &'static str, status: u16, url: impl Into<String>) -> Self {
        Self::Status {
            context,
            status,
            url: url.into(),
        }
    }

    /// Create a data-shape error for a listing endpoint.
    pub fn unexpected(path: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::UnexpectedResponse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
