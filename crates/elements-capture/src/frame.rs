//! Raw frame types.

use bytes::Bytes;

/// A captured camera frame.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Tightly packed RGB24 pixel data, as delivered by the camera.
    ///
    /// The data is *unmirrored*; mirroring happens only at render time.
    pub data: Bytes,

    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,

    /// Monotonically increasing sequence number.
    pub sequence: u64,
}

impl RawFrame {
    /// Create a new raw frame.
    pub fn new(data: Bytes, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            data,
            width,
            height,
            sequence,
        }
    }

    /// Expected RGB24 buffer size for the given dimensions.
    pub fn rgb_buffer_size(width: u32, height: u32) -> usize {
        (width * height) as usize * 3
    }

    /// Validate that the frame data matches expected dimensions.
    pub fn is_valid(&self) -> bool {
        self.data.len() == Self::rgb_buffer_size(self.width, self.height)
    }
}
