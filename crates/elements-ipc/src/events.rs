//! Events sent from the engine to the UI.

use serde::{Deserialize, Serialize};

use crate::state::LoopState;
use crate::types::{GameSnapshot, LoopStats};

/// Events that the engine can send to the UI shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientEvent {
    /// Loop state has changed.
    StateChanged {
        /// Previous state.
        previous: LoopState,

        /// Current state.
        current: LoopState,
    },

    /// Camera permission was denied; shown to the user as a persistent alert.
    PermissionAlert {
        /// Platform error message.
        message: String,
    },

    /// Updated loop statistics.
    Stats(LoopStats),

    /// The local game snapshot changed.
    GameUpdated(GameSnapshot),

    /// A recoverable error occurred (developer-visible only).
    Error {
        /// Whether recovery is possible.
        recoverable: bool,

        /// Error message.
        message: String,
    },

    /// Engine is ready.
    Ready,

    /// Engine has shut down.
    Shutdown,
}
