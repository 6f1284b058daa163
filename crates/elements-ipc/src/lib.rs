//! Typed UI<->engine messages for the elements client.
//!
//! This crate defines the message types exchanged between the UI shell and
//! the frame-loop engine, plus the loop state machine they both observe.

mod commands;
mod events;
mod state;
mod types;

pub use commands::ClientCommand;
pub use events::ClientEvent;
pub use state::LoopState;
pub use types::{GameSnapshot, LoopStats};

use crossbeam_channel::{Receiver, Sender};

/// Channel capacity for commands (UI → engine).
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Channel capacity for events (engine → UI).
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Creates a bounded command channel.
pub fn command_channel() -> (Sender<ClientCommand>, Receiver<ClientCommand>) {
    crossbeam_channel::bounded(COMMAND_CHANNEL_CAPACITY)
}

/// Creates a bounded event channel.
pub fn event_channel() -> (Sender<ClientEvent>, Receiver<ClientEvent>) {
    crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY)
}
