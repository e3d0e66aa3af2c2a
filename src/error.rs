// src/error.rs

//! Error types for the recipe-finder core

use thiserror::Error;

/// Errors produced by the meal API client, the favorites backend and the
/// session boundary
#[derive(Debug, Error)]
pub enum Error {
    /// Client construction or configuration failed
    #[error("Initialization error: {0}")]
    InitError(String),

    /// Transport failure or non-success status from the meal API
    #[error("Download error: {0}")]
    DownloadError(String),

    /// A response body or identifier could not be decoded
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// The favorites backend rejected or failed a request
    #[error("Favorites backend error{}: {message}", status_suffix(.status))]
    Backend {
        /// HTTP status, when the backend answered at all
        status: Option<u16>,
        message: String,
    },

    /// The identity provider failed an operation
    #[error("Identity provider error: {0}")]
    Identity(String),

    /// The action needs a signed-in user
    #[error("No user is signed in")]
    NotSignedIn,

    /// The operation is not supported by this implementation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl Error {
    /// Backend error without an HTTP status (transport or decode failure)
    pub fn backend(message: impl Into<String>) -> Self {
        Error::Backend {
            status: None,
            message: message.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Result type alias for recipe-finder operations
pub type Result<T> = std::result::Result<T, Error>;
