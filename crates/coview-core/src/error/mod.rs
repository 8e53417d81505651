//! Error types for the mediation tier.

use coview_cdp::CdpError;
use thiserror::Error;

/// Errors produced by browser session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session's CDP transport is gone.
    #[error("Browser not connected")]
    NotConnected,

    /// No page is currently attached.
    #[error("No active page")]
    NoActivePage,

    /// A node-targeted action could not resolve its node.
    #[error("Element with backendNodeId {0} not found or has no box model")]
    ElementNotFound(i64),

    /// The CDP transport reported an error.
    #[error(transparent)]
    Cdp(CdpError),
}

impl From<CdpError> for SessionError {
    fn from(err: CdpError) -> Self {
        match err {
            // A dead transport reads as "not connected" everywhere above the
            // transport layer.
            CdpError::ConnectionLost => Self::NotConnected,
            other => Self::Cdp(other),
        }
    }
}

/// Errors produced by the session registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The request came from a client with no bound session.
    #[error("No browser session")]
    NoSession,

    /// The action is not available to this client kind.
    #[error("{0}")]
    UnsupportedAction(&'static str),

    /// A session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors produced by the browser pool client.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The HTTP request to the pool failed.
    #[error("pool request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The pool replied but refused the operation.
    #[error("pool rejected request: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests;
