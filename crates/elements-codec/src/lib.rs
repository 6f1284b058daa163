//! Frame encoding and mirrored rendering.
//!
//! The backend expects natural, unmirrored frames; the user expects a
//! mirrored selfie view. This crate owns both halves of that contract:
//! [`encode_frame`] serializes the raw frame as-is, and [`RenderSink`]
//! paints the processed result horizontally flipped.

mod data_url;
mod encode;
mod error;
mod render;
mod surface;

pub use data_url::{decode_data_url, to_data_url};
pub use encode::{encode_frame, FramePayload};
pub use error::CodecError;
pub use render::RenderSink;
pub use surface::Surface;

/// MIME type of encoded frame payloads.
pub const JPEG_MIME: &str = "image/jpeg";

/// Fixed JPEG quality for outbound frames.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
