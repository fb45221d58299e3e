//! Market-data transport port

use crate::error::{HandlerError, TransportError};
use crate::lifecycle::LifecycleListener;
use async_trait::async_trait;
use chrono::NaiveDate;
use hermes_core::{Candle, Tick};
use std::sync::Arc;

/// Receiver of market data for one instrument.
///
/// Implemented both by strategy subscribers and by the fan-out layer's own
/// relay (which is what the upstream transport actually calls). A handler
/// returns `Err` to report its own failure; the fan-out logs it and
/// continues delivering to the remaining handlers.
#[async_trait]
pub trait MarketHandler: Send + Sync {
    async fn on_tick(&self, tick: Tick) -> Result<(), HandlerError>;

    async fn on_candle(&self, candle: Candle) -> Result<(), HandlerError>;

    /// A transport-level market data error, broadcast to all handlers
    async fn on_error(&self, code: i32, message: &str) -> Result<(), HandlerError>;
}

/// Upstream datafeed connectivity.
#[async_trait]
pub trait MarketDataTransport: Send + Sync {
    /// Open an upstream subscription for one instrument, delivering events
    /// to `handler`
    async fn subscribe(
        &self,
        instrument_id: &str,
        handler: Arc<dyn MarketHandler>,
    ) -> Result<(), TransportError>;

    /// Close the upstream subscription for one instrument
    async fn unsubscribe(&self, instrument_id: &str) -> Result<(), TransportError>;

    /// Connect and begin reporting lifecycle events to `listener`
    async fn start(&self, listener: Arc<dyn LifecycleListener>) -> Result<(), TransportError>;

    /// Disconnect from the feed
    async fn stop(&self) -> Result<(), TransportError>;

    /// The exchange-defined business date events are currently booked under
    fn trading_day(&self) -> NaiveDate;
}
