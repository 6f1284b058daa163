//! Frame-loop state machine types.

use serde::{Deserialize, Serialize};

/// The state of the frame loop.
///
/// One cycle walks `Capturing → AwaitingResponse → Rendering → Scheduled`,
/// with failed cycles skipping straight from `Capturing` or
/// `AwaitingResponse` to `Scheduled`. `Stopped` is terminal and reachable
/// from every state once the cancel guard is observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    /// Loop has not started.
    #[default]
    Idle,

    /// Grabbing and encoding the current camera frame.
    Capturing,

    /// One round trip to the backend is in flight.
    AwaitingResponse,

    /// Decoding and painting the processed frame, dispatching sounds.
    Rendering,

    /// Cycle complete; waiting for the next tick.
    Scheduled,

    /// Loop cancelled; no further transitions occur.
    Stopped,
}

impl LoopState {
    /// Returns true if the loop has not started.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if a round trip is currently outstanding.
    pub fn is_awaiting_response(&self) -> bool {
        matches!(self, Self::AwaitingResponse)
    }

    /// Returns true if the loop is running (neither idle nor stopped).
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Idle | Self::Stopped)
    }

    /// Returns true if the loop has been cancelled.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns true if `next` is a legal successor of this state.
    pub fn allows(&self, next: LoopState) -> bool {
        if next == Self::Stopped {
            // The cancel guard may fire in any state.
            return !self.is_stopped();
        }

        matches!(
            (self, next),
            (Self::Idle, Self::Capturing)
                | (Self::Scheduled, Self::Capturing)
                | (Self::Capturing, Self::AwaitingResponse)
                | (Self::Capturing, Self::Scheduled)
                | (Self::AwaitingResponse, Self::Rendering)
                | (Self::AwaitingResponse, Self::Scheduled)
                | (Self::Rendering, Self::Scheduled)
        )
    }

    /// Returns a simple string representation of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Capturing => "Capturing",
            Self::AwaitingResponse => "AwaitingResponse",
            Self::Rendering => "Rendering",
            Self::Scheduled => "Scheduled",
            Self::Stopped => "Stopped",
        }
    }
}
