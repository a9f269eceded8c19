//! Backend errors.

use thiserror::Error;

/// Errors that can occur when talking to the pricing backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot address API endpoints.
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),

    /// The backend returned a non-2xx response.
    #[error("unexpected response from backend: {0}")]
    UnexpectedResponse(String),

    /// The backend answered but refused the write.
    #[error("backend rejected request: {0}")]
    Rejected(String),
}
