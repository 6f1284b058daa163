//! Wire types for the frame-processing backend.

use serde::{Deserialize, Serialize};

/// Request body for `POST /process_frame`.
#[derive(Debug, Serialize)]
pub struct FrameRequest<'a> {
    /// Data-URL encoded JPEG of the unmirrored frame.
    pub frame: &'a str,
}

/// Structured result of one processed frame.
///
/// `image` and `sound_events` are meaningful only when `success` is true.
/// Unknown fields the server may add (hand landmarks and the like) are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessedFrameResult {
    /// Whether the server processed the frame.
    #[serde(default)]
    pub success: bool,

    /// Data-URL encoded annotated image.
    #[serde(default)]
    pub image: Option<String>,

    /// Sound effects to trigger, in order.
    #[serde(default)]
    pub sound_events: Vec<String>,

    /// Server-reported error message when `success` is false.
    #[serde(default)]
    pub error: Option<String>,

    /// Whether the gold combination has been achieved server-side.
    #[serde(default, rename = "goldAchieved")]
    pub gold_achieved: Option<bool>,
}
