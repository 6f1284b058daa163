//! Frame-loop engine for the elements client.
//!
//! The engine drives the capture → round trip → render cycle on a dedicated
//! thread. The UI shell talks to it exclusively through the command and
//! event channels defined in `elements-ipc`; the shell reads pixels from the
//! shared [`Surface`](elements_codec::Surface) handle.
//!
//! Failure discipline: every per-cycle failure (capture, transport, server,
//! decode) drops that cycle and reschedules the next one. Only explicit
//! commands or the cancel guard stop the loop.

mod controller;
mod error;
mod metrics;
mod scheduler;

#[cfg(test)]
mod testing;

pub use controller::Controller;
pub use error::{EngineError, EngineResult};
pub use metrics::LoopMetrics;
pub use scheduler::{LoopConfig, LoopHandle};
