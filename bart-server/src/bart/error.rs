//! BART client error types.

use super::normalize::ShapeError;

/// Errors from fetching one of the BART feeds.
#[derive(Debug, thiserror::Error)]
pub enum BartError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Body was not JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// JSON did not contain the expected containers
    #[error("unexpected response shape: {0}")]
    Shape(#[from] ShapeError),

    /// Client could not be set up
    #[error("not configured: {0}")]
    NotConfigured(String),
}
