//! Error types for the live voice session.

use thiserror::Error;

/// Result type for live session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a live voice session.
#[derive(Error, Debug)]
pub enum Error {
    /// Microphone permission denied or no capture device present.
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A second start() while a session is already running.
    #[error("session already active")]
    SessionAlreadyActive,

    /// Remote connection failed while the session was being established.
    #[error("session start failed: {0}")]
    SessionStart(String),

    /// A single uplink frame failed to send. Not fatal to the session;
    /// stale audio is never retried.
    #[error("transport send failed: {0}")]
    TransportSend(String),

    /// Malformed inbound audio payload. The segment is dropped.
    #[error("malformed audio payload: {0}")]
    Format(#[from] gridwatch_audio::FormatError),

    /// The remote endpoint closed the session.
    #[error("remote closed the session")]
    RemoteClosed,

    /// The remote endpoint reported an error. Terminal for the session.
    #[error("remote error: {0}")]
    Remote(String),

    /// WebSocket error.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
