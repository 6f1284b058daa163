//! Common types used across IPC messages.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Local, non-authoritative mirror of the server's game state.
///
/// The server is the source of truth; this snapshot exists so the UI can
/// show something without issuing its own requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Whether the gold combination has been achieved.
    pub gold_achieved: bool,

    /// The element the player is currently holding, if any.
    pub current_element: Option<String>,

    /// Sound effects observed during the most recent cycles.
    pub active_effects: BTreeSet<String>,
}

/// Real-time frame-loop statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoopStats {
    /// Completed cycles per second.
    pub fps: f32,

    /// Target cycles per second.
    pub target_fps: f32,

    /// Frames captured since the loop started.
    pub frames_captured: u64,

    /// Round trips that returned a well-formed success body.
    pub round_trips: u64,

    /// Cycles dropped because the request failed at the network layer.
    pub transport_failures: u64,

    /// Cycles dropped because the server reported success=false.
    pub server_failures: u64,

    /// Processed images that failed to decode and were dropped.
    pub decode_drops: u64,

    /// Frames that could not be grabbed from the camera.
    pub capture_drops: u64,

    /// Loop uptime in seconds.
    pub uptime_seconds: u64,
}
