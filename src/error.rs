//! Transport failure types

use thiserror::Error;

/// A request that never produced a usable response body.
///
/// Application-level failures (`success: false` in the body) are not errors
/// at this layer; they travel inside the parsed envelope.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed response payload: {0}")]
    Payload(String),
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;
