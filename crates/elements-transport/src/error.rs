//! Error types for the transport module.

use thiserror::Error;

/// Errors that can occur during a round trip.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request failed at the network layer.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Server returned status {0}")]
    Status(u16),

    /// The response body was not a well-formed result.
    #[error("Malformed response body: {0}")]
    Body(String),

    /// The configured server URL is invalid.
    #[error("Invalid server URL: {0}")]
    Url(String),
}
