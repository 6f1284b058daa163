//! Error types for the engine.

use thiserror::Error;

/// Errors that can occur while setting up the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The async runtime could not be created.
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
