//! Codec error types.

use thiserror::Error;

/// Errors raised while encoding or decoding hypermedia documents.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The input is not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The input is valid JSON but not a valid hypermedia document.
    #[error("malformed hypermedia document: {0}")]
    Malformed(String),
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
