//! Error types for the codec module.

use thiserror::Error;

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JPEG serialization failed.
    #[error("Frame encode error: {0}")]
    Encode(#[from] image::ImageError),

    /// The string is not a well-formed data URL.
    #[error("Malformed data URL: {0}")]
    DataUrl(String),

    /// The base64 body of a data URL could not be decoded.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}
