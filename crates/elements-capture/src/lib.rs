//! Webcam acquisition for the elements client.
//!
//! This crate owns the camera stream lifecycle and hands raw RGB frames
//! to the frame loop.

mod camera;
mod error;
mod frame;

pub use camera::{CameraConfig, CameraSession};
pub use error::CaptureError;
pub use frame::RawFrame;

/// Default capture width in pixels.
pub const DEFAULT_WIDTH: u32 = 640;

/// Default capture height in pixels.
pub const DEFAULT_HEIGHT: u32 = 480;

/// Default capture frame rate.
pub const DEFAULT_FPS: u32 = 30;

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Trait for camera frame sources.
pub trait FrameSource {
    /// Acquire the camera stream. Fails with [`CaptureError::PermissionDenied`]
    /// when the platform refuses access.
    fn start(&mut self) -> CaptureResult<()>;

    /// Grab the current frame.
    fn grab(&mut self) -> CaptureResult<RawFrame>;

    /// Release the camera stream. Safe to call when already stopped.
    fn stop(&mut self);

    /// Negotiated frame dimensions.
    fn dimensions(&self) -> (u32, u32);

    /// Check if the stream is currently open.
    fn is_active(&self) -> bool;
}
