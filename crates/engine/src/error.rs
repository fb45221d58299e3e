//! Engine errors
//!
//! Only the timeout variant ever reaches a `submit` caller. Transport
//! rejections become order updates, persistence failures degrade to
//! empty results, and handler failures are contained at the fan-out
//! boundary; all of them are logged where they happen.

use hermes_core::OrderId;
use std::fmt;
use thiserror::Error;

/// Which wait of the two-phase submission gave up.
///
/// `Create`: the original submission never completed, but the
/// cancel-on-timeout was confirmed. `Cancel`: the broker did not respond
/// to the cancel either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPhase {
    Create,
    Cancel,
}

impl fmt::Display for TimeoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutPhase::Create => write!(f, "create"),
            TimeoutPhase::Cancel => write!(f, "cancel"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("order {order_id} timed out awaiting {phase} confirmation")]
    Timeout {
        order_id: OrderId,
        phase: TimeoutPhase,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
