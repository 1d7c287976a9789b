//! Error taxonomy for the voice core.
//!
//! Nothing here is fatal to the host process: callers catch these at the
//! operation boundary and degrade (notification, fallback defaults) rather
//! than propagate a crash.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    /// The engine rejected a start/speak call synchronously.
    #[error("speech engine call failed: {0}")]
    Engine(String),

    /// The settings/history backend rejected a command.
    #[error("backend command failed: {0}")]
    Backend(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
