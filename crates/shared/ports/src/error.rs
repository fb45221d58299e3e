//! Errors crossing the port boundaries

use thiserror::Error;

/// Failure reported by an execution or market-data transport
#[derive(Error, Debug)]
pub enum TransportError {
    /// The transport refused the request outright
    #[error("transport rejected request: [{code}]{message}")]
    Rejected { code: i32, message: String },

    /// The transport is not connected or has shut down
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    /// Anything else the transport surfaces
    #[error("transport failure: {0}")]
    Other(String),
}

/// Failure reported by the durable store.
///
/// The core never propagates these: they are logged at the point of
/// occurrence and the operation degrades to an empty or zero result.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store query failed: {0}")]
    Query(String),

    #[error("store write failed: {0}")]
    Write(String),
}

/// Failure raised by a subscriber's own handler code.
///
/// Caught at the fan-out boundary, logged, and never allowed to abort the
/// broadcast or reach the transport task.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}
