//! Execution transport port
//!
//! Broker/exchange connectivity the correlator submits orders through.
//! The transport is callback-driven: after `submit_order` returns, it may
//! invoke the supplied [`OrderEvents`] from its own tasks at any time,
//! any number of times, until the order reaches a terminal status.

use crate::error::TransportError;
use crate::lifecycle::LifecycleListener;
use async_trait::async_trait;
use chrono::NaiveDate;
use hermes_core::{Order, Trade};
use std::sync::Arc;

/// Order/trade event sink handed to the transport with each submission.
///
/// Callbacks for a single order arrive in transport order; callbacks for
/// different orders carry no relative ordering and may interleave.
#[async_trait]
pub trait OrderEvents: Send + Sync {
    /// A status snapshot for the submitted order
    async fn on_order(&self, order: Order);

    /// A fill for the submitted order
    async fn on_trade(&self, trade: Trade);

    /// The transport failed the submission with a broker error code
    async fn on_error(&self, code: i32, message: &str);
}

/// Broker connectivity for order submission and cancellation.
#[async_trait]
pub trait ExecutionTransport: Send + Sync {
    /// Forward an order to the broker. Asynchronous: completion is
    /// reported through `events`, not the return value.
    async fn submit_order(
        &self,
        order: &Order,
        events: Arc<dyn OrderEvents>,
    ) -> Result<(), TransportError>;

    /// Request cancellation of a previously submitted order
    async fn cancel_order(&self, order: &Order) -> Result<(), TransportError>;

    /// Connect and begin reporting lifecycle events to `listener`
    async fn start(&self, listener: Arc<dyn LifecycleListener>) -> Result<(), TransportError>;

    /// Disconnect from the broker
    async fn stop(&self) -> Result<(), TransportError>;

    /// The exchange-defined business date events are currently booked under
    fn trading_day(&self) -> NaiveDate;
}
