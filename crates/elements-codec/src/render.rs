//! Inbound frame rendering.

use tracing::debug;

use crate::data_url::decode_data_url;
use crate::surface::Surface;

/// Paints processed frames onto the display surface.
///
/// Decode failures are swallowed: the frame is dropped and the loop is never
/// interrupted by a bad image.
#[derive(Debug, Default)]
pub struct RenderSink;

impl RenderSink {
    /// Create a new render sink.
    pub fn new() -> Self {
        Self
    }

    /// Decode `data_url` and draw it mirrored onto `surface`.
    ///
    /// Returns true if the surface was redrawn, false if the frame was
    /// dropped.
    pub fn present(&self, data_url: &str, surface: &mut Surface) -> bool {
        let bytes = match decode_data_url(data_url) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Dropping frame with malformed data URL: {}", e);
                return false;
            }
        };

        let image = match image::load_from_memory(&bytes) {
            Ok(image) => image.to_rgb8(),
            Err(e) => {
                debug!("Dropping undecodable frame: {}", e);
                return false;
            }
        };

        surface.present_mirrored(&image);
        true
    }
}
