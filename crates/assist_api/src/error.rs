//! Error model used by backend client operations.

use std::io;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Represents the failures a backend call can end with: a non-success HTTP status carrying the backend message, authentication rejections, timeouts, transport failures, payload (de)serialization problems and other unexpected errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Http { status: StatusCode, message: String },
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl ApiError {
    /// Constructs an HTTP error variant.
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status for errors that carry one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    /// Converts reqwest errors into semantic ApiError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            ApiError::Http {
                status,
                message: err.to_string(),
            }
        } else if err.is_connect() || err.is_request() {
            ApiError::Network(err.to_string())
        } else if err.is_decode() {
            ApiError::Serialization(err.to_string())
        } else {
            ApiError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    /// Converts serde_json decode/encode failures into serialization errors.
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}
