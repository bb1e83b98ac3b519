//! Output context errors
//!
//! Control calls on `Engine` never return these: the facade logs them and
//! degrades to a no-op. Only `Engine::suspend` and `Engine::resume` hand
//! them back to the host.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// No output device available
    #[error("No audio output device found")]
    NoOutputDevice,

    /// Failed to query the device configuration
    #[error("Failed to get device config: {0}")]
    DeviceConfig(String),

    /// Failed to build the output stream
    #[error("Failed to build audio stream: {0}")]
    StreamBuild(String),

    /// Failed to start or resume the stream
    #[error("Failed to start audio stream: {0}")]
    StreamPlay(String),

    /// Failed to suspend the stream
    #[error("Failed to pause audio stream: {0}")]
    StreamPause(String),

    /// Device sample format has no conversion
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The context was closed and cannot be used again
    #[error("Audio context is closed")]
    ContextClosed,

    /// The output thread could not be spawned or went away
    #[error("Audio output thread failed: {0}")]
    OutputThread(String),
}

/// Result type for output context operations
pub type EngineResult<T> = Result<T, EngineError>;
