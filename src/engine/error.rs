//! Engine-boundary error types.

use std::io;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while talking to the analytical engine.
///
/// Every variant is recoverable at the provider level: introspection and
/// evaluation failures transition the provider to `Faulted` and surface on
/// the sink's log channel; they never cross the background-task boundary as
/// a panic.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to spawn the bridge process.
    #[error("failed to spawn engine bridge: {0}")]
    SpawnFailed(#[source] io::Error),

    /// Failed to write to bridge stdin.
    #[error("failed to write to engine bridge: {0}")]
    WriteFailed(#[source] io::Error),

    /// Failed to read from bridge stdout.
    #[error("failed to read from engine bridge: {0}")]
    ReadFailed(#[source] io::Error),

    /// Failed to serialize a request to JSON.
    #[error("failed to serialize request: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    /// Failed to deserialize a response from JSON.
    #[error("failed to deserialize response: {0}")]
    DeserializeFailed(#[source] serde_json::Error),

    /// Request timed out waiting for a response.
    #[error("engine request timed out after {0} seconds")]
    Timeout(u64),

    /// Bridge process exited unexpectedly.
    #[error("engine bridge exited unexpectedly")]
    BridgeExited,

    /// Response channel was closed (internal error).
    #[error("response channel closed unexpectedly")]
    ChannelClosed,

    /// Bridge returned an error response with an unrecognized code.
    #[error("engine error: {message} (code: {code})")]
    Remote {
        /// Error code from the bridge.
        code: String,
        /// Error message from the bridge.
        message: String,
    },

    /// The engine refused or dropped the connection.
    #[error("engine connection failed: {0}")]
    ConnectionFailed(String),

    /// The engine rejected the supplied credentials.
    #[error("engine authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Method not recognized by the bridge.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// The engine returned schema metadata that cannot be mapped to
    /// symbols. Carries the offending table name for diagnosability;
    /// propagates like any other engine failure.
    #[error("malformed metadata for table '{table}': {detail}")]
    MalformedMetadata {
        /// Table whose metadata could not be mapped.
        table: String,
        /// What was wrong with it.
        detail: String,
    },
}

impl EngineError {
    /// Create a remote error from an error response.
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Check if this error indicates the bridge has exited.
    pub fn is_bridge_exited(&self) -> bool {
        matches!(self, Self::BridgeExited | Self::ChannelClosed)
    }

    /// Check if this error is retriable by reconnecting.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::BridgeExited | Self::ChannelClosed
        )
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        Self::WriteFailed(err)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::DeserializeFailed(err)
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for EngineError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Self::ChannelClosed
    }
}
