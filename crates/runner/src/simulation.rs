//! Simulated transports
//!
//! In-process paper implementations of the transport ports, used by the
//! integration tests and by demo runs without broker connectivity:
//!
//! - [`SimulatedExecution`] accepts and completely fills every order at
//!   its limit price
//! - [`SimulatedFeed`] delivers ticks pushed by the test into whatever
//!   handler the engine subscribed
//!
//! Both emit `Start` then `Open` on start, and `Close` then `Stop` on
//! stop, mirroring a broker session that opens immediately.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use hermes_core::{Order, OrderStatus, Tick, Trade};
use hermes_ports::{
    ExecutionTransport, LifecycleEvent, LifecycleListener, MarketDataTransport, MarketHandler,
    OrderEvents, TransportError,
};
use log::info;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::Mutex;

fn default_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 3, 15).expect("valid date")
}

/// Paper execution transport: every order is accepted, fully filled at
/// its limit price, then reported `Filled`. Cancels confirm immediately
/// with a `Cancelled` snapshot.
pub struct SimulatedExecution {
    trading_day: Mutex<NaiveDate>,
    listener: Mutex<Option<Arc<dyn LifecycleListener>>>,
}

impl SimulatedExecution {
    pub fn new() -> Self {
        Self {
            trading_day: Mutex::new(default_day()),
            listener: Mutex::new(None),
        }
    }

    /// Override the business date fills are booked under
    pub fn set_trading_day(&self, day: NaiveDate) {
        *self.trading_day.lock().expect("trading day poisoned") = day;
    }

    fn listener(&self) -> Option<Arc<dyn LifecycleListener>> {
        self.listener.lock().expect("listener poisoned").clone()
    }
}

impl Default for SimulatedExecution {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionTransport for SimulatedExecution {
    async fn submit_order(
        &self,
        order: &Order,
        events: Arc<dyn OrderEvents>,
    ) -> Result<(), TransportError> {
        let order = order.clone();
        let fill_day = *self.trading_day.lock().expect("trading day poisoned");
        tokio::spawn(async move {
            info!("[SIM] accepting order {}", order.id);
            let mut accepted = order.clone();
            accepted.set_status(OrderStatus::Accepted, Utc::now());
            events.on_order(accepted).await;

            let trade = Trade::new_with_time(
                order.id,
                &order.instrument_id,
                &order.exchange_id,
                order.price,
                order.quantity,
                order.direction,
                order.offset,
                fill_day,
                Utc::now(),
            );
            events.on_trade(trade).await;

            let mut filled = order.clone();
            filled.set_status(OrderStatus::Filled, Utc::now());
            events.on_order(filled).await;
        });
        Ok(())
    }

    async fn cancel_order(&self, order: &Order) -> Result<(), TransportError> {
        info!("[SIM] cancel confirmed for order {}", order.id);
        Ok(())
    }

    async fn start(&self, listener: Arc<dyn LifecycleListener>) -> Result<(), TransportError> {
        *self.listener.lock().expect("listener poisoned") = Some(Arc::clone(&listener));
        listener.on_lifecycle(LifecycleEvent::Start).await;
        listener.on_lifecycle(LifecycleEvent::Open).await;
        Ok(())
    }

    async fn stop(&self) -> Result<(), TransportError> {
        if let Some(listener) = self.listener() {
            listener.on_lifecycle(LifecycleEvent::Close).await;
            listener.on_lifecycle(LifecycleEvent::Stop).await;
        }
        Ok(())
    }

    fn trading_day(&self) -> NaiveDate {
        *self.trading_day.lock().expect("trading day poisoned")
    }
}

/// Paper datafeed: holds the handler the engine subscribed per
/// instrument and replays whatever ticks the host pushes.
pub struct SimulatedFeed {
    handlers: DashMap<String, Arc<dyn MarketHandler>>,
    listener: Mutex<Option<Arc<dyn LifecycleListener>>>,
    trading_day: NaiveDate,
}

impl SimulatedFeed {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
            listener: Mutex::new(None),
            trading_day: default_day(),
        }
    }

    /// Instruments with an open upstream subscription
    pub fn subscribed(&self) -> Vec<String> {
        self.handlers.iter().map(|e| e.key().clone()).collect()
    }

    /// Build a minimal tick for `instrument_id` quoted around `price`
    pub fn tick(&self, instrument_id: &str, exchange_id: &str, price: Decimal) -> Tick {
        Tick {
            id: uuid::Uuid::new_v4().to_string(),
            instrument_id: instrument_id.to_string(),
            exchange_id: exchange_id.to_string(),
            open_price: price,
            high_price: price,
            low_price: price,
            last_price: price,
            settle_price: price,
            pre_settle_price: price,
            ask_price: price + Decimal::ONE,
            bid_price: price - Decimal::ONE,
            ask_volume: 10,
            bid_volume: 10,
            trade_volume: 1,
            open_interest: 100,
            trading_day: self.trading_day,
            update_time: Utc::now(),
        }
    }

    /// Deliver one tick into the subscribed handler, if any
    pub async fn push_tick(&self, tick: Tick) {
        let handler = self
            .handlers
            .get(&tick.instrument_id)
            .map(|e| Arc::clone(e.value()));
        if let Some(handler) = handler {
            if let Err(e) = handler.on_tick(tick).await {
                info!("[SIM] subscriber rejected tick: {}", e);
            }
        }
    }

    fn listener(&self) -> Option<Arc<dyn LifecycleListener>> {
        self.listener.lock().expect("listener poisoned").clone()
    }
}

impl Default for SimulatedFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataTransport for SimulatedFeed {
    async fn subscribe(
        &self,
        instrument_id: &str,
        handler: Arc<dyn MarketHandler>,
    ) -> Result<(), TransportError> {
        info!("[SIM] upstream subscribe {}", instrument_id);
        self.handlers.insert(instrument_id.to_string(), handler);
        Ok(())
    }

    async fn unsubscribe(&self, instrument_id: &str) -> Result<(), TransportError> {
        info!("[SIM] upstream unsubscribe {}", instrument_id);
        self.handlers.remove(instrument_id);
        Ok(())
    }

    async fn start(&self, listener: Arc<dyn LifecycleListener>) -> Result<(), TransportError> {
        *self.listener.lock().expect("listener poisoned") = Some(Arc::clone(&listener));
        listener.on_lifecycle(LifecycleEvent::Start).await;
        listener.on_lifecycle(LifecycleEvent::Open).await;
        Ok(())
    }

    async fn stop(&self) -> Result<(), TransportError> {
        if let Some(listener) = self.listener() {
            listener.on_lifecycle(LifecycleEvent::Close).await;
            listener.on_lifecycle(LifecycleEvent::Stop).await;
        }
        Ok(())
    }

    fn trading_day(&self) -> NaiveDate {
        self.trading_day
    }
}
