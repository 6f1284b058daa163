//! Error types for the capture module.

use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The platform denied camera access.
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),

    /// No camera matched the requested index.
    #[error("Camera not found: index {0}")]
    DeviceNotFound(u32),

    /// The device could not be opened or configured.
    #[error("Camera device error: {0}")]
    Device(String),

    /// Reading a frame from the open stream failed.
    #[error("Frame read error: {0}")]
    Frame(String),

    /// Decoding the raw buffer into RGB pixels failed.
    #[error("Frame decode error: {0}")]
    Decode(String),

    /// Capture not started.
    #[error("Capture not started")]
    NotStarted,
}

impl CaptureError {
    /// Classify a platform error message from the camera backend.
    ///
    /// The backends report permission refusals as opaque strings, so the
    /// mapping is by message content.
    pub fn from_backend(message: String) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("permission") || lower.contains("denied") || lower.contains("access") {
            Self::PermissionDenied(message)
        } else {
            Self::Device(message)
        }
    }

    /// Returns true for errors that mean the user refused camera access.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}
