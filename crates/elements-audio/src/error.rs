//! Error types for the audio module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during audio operations.
#[derive(Debug, Error)]
pub enum AudioError {
    /// A sound clip could not be read or decoded.
    #[error("Failed to load clip {path}: {source}")]
    ClipLoad {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// The clip file has a layout the mixer cannot play.
    #[error("Unsupported clip format in {path}: {reason}")]
    ClipFormat { path: PathBuf, reason: String },

    /// The output stream could not be created or started.
    #[error("Output stream error: {0}")]
    Stream(String),
}
