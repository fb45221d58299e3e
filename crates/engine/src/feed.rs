//! Market Data Fan-out
//!
//! Maintains per-instrument subscriber sets and broadcasts each incoming
//! tick/candle to every subscriber concurrently, capturing one handler's
//! failure without disturbing the rest or the upstream transport task.
//!
//! Registry invariant: an instrument has an upstream subscription open
//! exactly while its handler set is non-empty. Every mutation path keeps
//! the two in lock-step under one mutation lock; delivery reads a
//! snapshot and never takes that lock.

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use hermes_core::{Candle, Tick};
use hermes_ports::{HandlerError, MarketDataTransport, MarketHandler, TransportError};
use log::{debug, error};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// Fans incoming market data out to strategy handlers.
pub struct MarketFeed {
    datafeed: Arc<dyn MarketDataTransport>,
    relay: Arc<FeedRelay>,
    // Serializes subscribe/unsubscribe so registry and upstream state
    // move in lock-step
    mutation: Mutex<()>,
}

impl MarketFeed {
    pub fn new(datafeed: Arc<dyn MarketDataTransport>) -> Self {
        Self {
            datafeed,
            relay: Arc::new(FeedRelay {
                registry: DashMap::new(),
            }),
            mutation: Mutex::new(()),
        }
    }

    /// Register `handler` for an instrument. The first handler for an
    /// instrument opens the upstream subscription; an upstream failure
    /// leaves the registry untouched.
    pub async fn subscribe(
        &self,
        instrument_id: &str,
        handler: Arc<dyn MarketHandler>,
    ) -> Result<(), TransportError> {
        let _guard = self.mutation.lock().await;
        if !self.relay.registry.contains_key(instrument_id) {
            let upstream: Arc<dyn MarketHandler> = self.relay.clone();
            self.datafeed.subscribe(instrument_id, upstream).await?;
            debug!("[FEED] opened upstream subscription for {}", instrument_id);
        }
        self.relay
            .registry
            .entry(instrument_id.to_string())
            .or_default()
            .push(handler);
        Ok(())
    }

    /// Remove one handler (by identity); closing the last one closes the
    /// upstream subscription.
    pub async fn unsubscribe_handler(
        &self,
        instrument_id: &str,
        handler: &Arc<dyn MarketHandler>,
    ) -> Result<(), TransportError> {
        let _guard = self.mutation.lock().await;
        let remaining = {
            let Some(entry) = self.relay.registry.get(instrument_id) else {
                return Ok(());
            };
            entry.iter().filter(|h| !Arc::ptr_eq(h, handler)).count()
        };
        if remaining == 0 {
            // Close upstream before dropping the entry so a failure leaves
            // registry and upstream state untouched
            self.datafeed.unsubscribe(instrument_id).await?;
            self.relay.registry.remove(instrument_id);
            debug!("[FEED] closed upstream subscription for {}", instrument_id);
        } else if let Some(mut entry) = self.relay.registry.get_mut(instrument_id) {
            entry.retain(|h| !Arc::ptr_eq(h, handler));
        }
        Ok(())
    }

    /// Remove all handlers for an instrument and close the upstream
    /// subscription.
    pub async fn unsubscribe(&self, instrument_id: &str) -> Result<(), TransportError> {
        let _guard = self.mutation.lock().await;
        if !self.relay.registry.contains_key(instrument_id) {
            return Ok(());
        }
        self.datafeed.unsubscribe(instrument_id).await?;
        self.relay.registry.remove(instrument_id);
        debug!("[FEED] closed upstream subscription for {}", instrument_id);
        Ok(())
    }

    /// Number of handlers currently registered for an instrument
    pub fn handler_count(&self, instrument_id: &str) -> usize {
        self.relay
            .registry
            .get(instrument_id)
            .map(|e| e.len())
            .unwrap_or(0)
    }

    /// The datafeed transport's current trading day
    pub fn trading_day(&self) -> NaiveDate {
        self.datafeed.trading_day()
    }
}

/// The handler the upstream transport actually calls: looks up the
/// subscriber set for the event's instrument and broadcasts.
struct FeedRelay {
    registry: DashMap<String, Vec<Arc<dyn MarketHandler>>>,
}

impl FeedRelay {
    fn snapshot(&self, instrument_id: &str) -> Vec<Arc<dyn MarketHandler>> {
        self.registry
            .get(instrument_id)
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    fn snapshot_all(&self) -> Vec<Arc<dyn MarketHandler>> {
        self.registry
            .iter()
            .flat_map(|e| e.value().clone())
            .collect()
    }

    /// Join the broadcast tasks, logging failures instead of propagating
    /// the first one.
    async fn drain(mut tasks: JoinSet<Result<(), HandlerError>>, what: &str) {
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("[FEED] {} handler failed: {}", what, e),
                Err(e) => error!("[FEED] {} handler panicked: {}", what, e),
            }
        }
    }
}

#[async_trait]
impl MarketHandler for FeedRelay {
    async fn on_tick(&self, tick: Tick) -> Result<(), HandlerError> {
        let mut tasks = JoinSet::new();
        for handler in self.snapshot(&tick.instrument_id) {
            let tick = tick.clone();
            tasks.spawn(async move { handler.on_tick(tick).await });
        }
        Self::drain(tasks, "tick").await;
        Ok(())
    }

    async fn on_candle(&self, candle: Candle) -> Result<(), HandlerError> {
        let mut tasks = JoinSet::new();
        for handler in self.snapshot(&candle.instrument_id) {
            let candle = candle.clone();
            tasks.spawn(async move { handler.on_candle(candle).await });
        }
        Self::drain(tasks, "candle").await;
        Ok(())
    }

    async fn on_error(&self, code: i32, message: &str) -> Result<(), HandlerError> {
        let mut tasks = JoinSet::new();
        for handler in self.snapshot_all() {
            let message = message.to_string();
            tasks.spawn(async move { handler.on_error(code, &message).await });
        }
        Self::drain(tasks, "error").await;
        Ok(())
    }
}
