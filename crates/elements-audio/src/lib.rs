//! Preloaded sound-effect playback.
//!
//! Clips are decoded once at mount into a [`SoundRegistry`] and mixed into a
//! single cpal output stream. Triggering a clip that is already playing
//! restarts it; nothing is ever queued.

mod error;
mod mixer;
mod registry;

pub use error::AudioError;
pub use mixer::{ClipMixer, EffectDispatcher};
pub use registry::{Clip, SoundRegistry};

/// Output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 48000;

/// Number of output channels.
pub const CHANNELS: u16 = 2;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Trait for dispatching server-emitted sound events.
///
/// Playback is fire-and-forget; implementations must never block the caller
/// or surface playback failures to it.
pub trait EffectSink {
    /// Trigger each event's clip, in order. Unknown IDs are ignored.
    fn trigger(&self, events: &[String]);

    /// Stop and rewind every currently playing clip.
    fn stop_all(&self);
}
