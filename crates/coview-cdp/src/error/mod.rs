//! Error types for the CDP transport.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by the CDP transport layer.
#[derive(Debug, Error)]
pub enum CdpError {
    /// The WebSocket connection could not be established.
    #[error("WebSocket connection failed: {0}")]
    ConnectionFailed(String),

    /// The WebSocket connection dropped or was closed.
    ///
    /// Every call pending at close time fails with this variant, and every
    /// later call fails with it immediately.
    #[error("WebSocket connection lost")]
    ConnectionLost,

    /// A CDP message could not be queued for sending.
    #[error("failed to send CDP message: {0}")]
    SendFailed(String),

    /// The browser replied with a protocol-level error.
    #[error("CDP protocol error {code}: {message}")]
    Protocol {
        /// Error code reported by the browser.
        code: i64,
        /// Error message reported by the browser.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No response arrived within the command timeout.
    #[error("response timeout after {0:?}")]
    Timeout(Duration),

    /// The WebSocket URL was malformed.
    #[error("invalid WebSocket URL: {0}")]
    InvalidUrl(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error;
        match err {
            Error::ConnectionClosed | Error::AlreadyClosed => Self::ConnectionLost,
            Error::Url(e) => Self::InvalidUrl(e.to_string()),
            other => Self::ConnectionFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests;
