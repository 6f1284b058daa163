//! Commands sent from the UI to the engine.

use serde::{Deserialize, Serialize};

/// Commands that the UI shell can send to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientCommand {
    /// Start the camera and begin the frame loop.
    StartCamera,

    /// Stop the frame loop and release the camera.
    StopCamera,

    /// Ask the backend to reset the game and silence local audio.
    Reset,

    /// Request the current loop state.
    GetState,

    /// Shut the engine down completely.
    Shutdown,
}
