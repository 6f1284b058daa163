//! HTTP round-trip client for the frame-processing backend.
//!
//! One request per frame cycle; the caller treats every failure here as a
//! soft failure and reschedules.

mod client;
mod error;
mod protocol;

pub use client::GameClient;
pub use error::TransportError;
pub use protocol::{FrameRequest, ProcessedFrameResult};

use elements_codec::FramePayload;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Trait for the per-cycle round trip to the backend.
///
/// The frame loop is generic over this seam so its behavior can be tested
/// against scripted responses.
#[allow(async_fn_in_trait)]
pub trait FrameProcessor {
    /// Send one frame payload and await the structured result.
    ///
    /// Returns well-formed bodies verbatim, including `success=false` ones.
    async fn process_frame(&self, payload: &FramePayload)
        -> TransportResult<ProcessedFrameResult>;

    /// Ask the backend to reset the game.
    async fn reset_game(&self) -> TransportResult<()>;
}
