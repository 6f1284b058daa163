//! Camera session over the nokhwa backend.

use bytes::Bytes;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use tracing::{debug, info, warn};

use crate::error::CaptureError;
use crate::frame::RawFrame;
use crate::{CaptureResult, FrameSource, DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Camera acquisition constraints.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Platform camera index (0 = the user-facing default).
    pub index: u32,

    /// Requested width in pixels.
    pub width: u32,

    /// Requested height in pixels.
    pub height: u32,

    /// Requested frame rate.
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
        }
    }
}

/// An exclusive handle on one camera stream.
///
/// Created on start, destroyed on stop or unmount; the owner must not let it
/// outlive the component that started it.
pub struct CameraSession {
    config: CameraConfig,
    camera: Option<Camera>,
    dimensions: (u32, u32),
    sequence: u64,
}

impl CameraSession {
    /// Create an unopened session with the given constraints.
    pub fn new(config: CameraConfig) -> Self {
        let dimensions = (config.width, config.height);
        Self {
            config,
            camera: None,
            dimensions,
            sequence: 0,
        }
    }
}

impl FrameSource for CameraSession {
    fn start(&mut self) -> CaptureResult<()> {
        if self.camera.is_some() {
            debug!("Camera already started, ignoring");
            return Ok(());
        }

        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(self.config.width, self.config.height),
                FrameFormat::MJPEG,
                self.config.fps,
            ),
        ));

        let mut camera = Camera::new(CameraIndex::Index(self.config.index), requested)
            .map_err(|e| CaptureError::from_backend(e.to_string()))?;

        camera
            .open_stream()
            .map_err(|e| CaptureError::from_backend(e.to_string()))?;

        // The backend may negotiate a different resolution than requested;
        // the render target is sized from what it actually reports.
        let resolution = camera.resolution();
        self.dimensions = (resolution.width(), resolution.height());
        self.sequence = 0;
        self.camera = Some(camera);

        info!(
            width = self.dimensions.0,
            height = self.dimensions.1,
            "Camera stream opened"
        );
        Ok(())
    }

    fn grab(&mut self) -> CaptureResult<RawFrame> {
        let camera = self.camera.as_mut().ok_or(CaptureError::NotStarted)?;

        let buffer = camera
            .frame()
            .map_err(|e| CaptureError::Frame(e.to_string()))?;

        let image = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::Decode(e.to_string()))?;

        let (width, height) = (image.width(), image.height());
        self.sequence += 1;

        Ok(RawFrame::new(
            Bytes::from(image.into_raw()),
            width,
            height,
            self.sequence,
        ))
    }

    fn stop(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                warn!("Error stopping camera stream: {}", e);
            }
            info!("Camera stream released");
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn is_active(&self) -> bool {
        self.camera.is_some()
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}
