//! Outbound frame serialization.

use image::codecs::jpeg::JpegEncoder;
use image::ColorType;

use elements_capture::RawFrame;

use crate::data_url::to_data_url;
use crate::{CodecResult, JPEG_MIME};

/// One compressed, unmirrored frame ready for transmission.
///
/// Ephemeral: created and consumed within a single loop cycle.
#[derive(Debug, Clone)]
pub struct FramePayload {
    /// `data:image/jpeg;base64,…` representation of the frame.
    pub data_url: String,
}

impl FramePayload {
    /// Length of the encoded representation in bytes.
    pub fn len(&self) -> usize {
        self.data_url.len()
    }

    /// Returns true if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data_url.is_empty()
    }
}

/// Serialize a raw frame to a JPEG data URL at the given quality.
///
/// The pixels are encoded exactly as captured, without the horizontal
/// mirroring used for display. Deterministic for identical input.
pub fn encode_frame(frame: &RawFrame, quality: u8) -> CodecResult<FramePayload> {
    let mut jpeg = Vec::with_capacity(frame.data.len() / 8);

    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
    encoder.encode(&frame.data, frame.width, frame.height, ColorType::Rgb8)?;

    Ok(FramePayload {
        data_url: to_data_url(JPEG_MIME, &jpeg),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn solid_frame(r: u8, g: u8, b: u8) -> RawFrame {
        let data: Vec<u8> = [r, g, b].repeat(16 * 8);
        RawFrame::new(Bytes::from(data), 16, 8, 1)
    }

    #[test]
    fn test_payload_is_jpeg_data_url() {
        let payload = encode_frame(&solid_frame(10, 20, 30), 80).unwrap();
        assert!(payload.data_url.starts_with("data:image/jpeg;base64,"));

        let bytes = crate::decode_data_url(&payload.data_url).unwrap();
        // JPEG SOI marker.
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let frame = solid_frame(200, 100, 50);
        let a = encode_frame(&frame, 80).unwrap();
        let b = encode_frame(&frame, 80).unwrap();
        assert_eq!(a.data_url, b.data_url);
    }

    #[test]
    fn test_decoded_dimensions_match() {
        let payload = encode_frame(&solid_frame(0, 0, 0), 80).unwrap();
        let bytes = crate::decode_data_url(&payload.data_url).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 8);
    }
}
