//! Error types for the disposable-inbox client.

use thiserror::Error;

/// Errors that can occur while talking to the mail provider.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider request URL could not be assembled.
    #[error("invalid provider endpoint: {msg}")]
    Endpoint {
        /// What went wrong while building the request URL.
        msg: String,
    },
}
