//! End-to-end engine tests: orders submitted through the context's
//! correlator produce fills that land in the position ledger.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use hermes_core::{Direction, Offset, Order, OrderStatus, Trade};
use hermes_engine::Context;
use hermes_ports::{
    DurableStore, ExecutionTransport, LifecycleListener, MarketDataTransport, MarketHandler,
    OrderEvents, TransportError,
};
use hermes_store::MemoryStore;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
}

/// Execution transport that accepts and completely fills every order,
/// booking the fill under a configurable trading day.
struct FillingExecution {
    fill_day: std::sync::Mutex<NaiveDate>,
}

impl FillingExecution {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            fill_day: std::sync::Mutex::new(day(1)),
        })
    }

    fn set_fill_day(&self, d: NaiveDate) {
        *self.fill_day.lock().unwrap() = d;
    }
}

#[async_trait]
impl ExecutionTransport for FillingExecution {
    async fn submit_order(
        &self,
        order: &Order,
        events: Arc<dyn OrderEvents>,
    ) -> Result<(), TransportError> {
        let order = order.clone();
        let fill_day = *self.fill_day.lock().unwrap();
        tokio::spawn(async move {
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

    async fn cancel_order(&self, _order: &Order) -> Result<(), TransportError> {
        Ok(())
    }

    async fn start(&self, _listener: Arc<dyn LifecycleListener>) -> Result<(), TransportError> {
        Ok(())
    }

    async fn stop(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn trading_day(&self) -> NaiveDate {
        day(1)
    }
}

struct IdleDatafeed;

#[async_trait]
impl MarketDataTransport for IdleDatafeed {
    async fn subscribe(
        &self,
        _instrument_id: &str,
        _handler: Arc<dyn MarketHandler>,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    async fn unsubscribe(&self, _instrument_id: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn start(&self, _listener: Arc<dyn LifecycleListener>) -> Result<(), TransportError> {
        Ok(())
    }

    async fn stop(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn trading_day(&self) -> NaiveDate {
        day(1)
    }
}

#[tokio::test]
async fn test_open_then_close_flows_into_ledger() {
    let _ = env_logger::try_init();
    let execution = FillingExecution::new();
    let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
    let ctx = Context::new(execution.clone(), Arc::new(IdleDatafeed), store);

    // Open 3 lots on day 1
    let open = Order::new(
        "c2105",
        "DCE",
        dec!(5230),
        3,
        Direction::Buy,
        Offset::Open,
        day(1),
    );
    let done = ctx
        .correlator()
        .submit(open, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(done.status, OrderStatus::Filled);

    // Close 2 of them on day 2 with an opposite-direction order
    execution.set_fill_day(day(2));
    let close = Order::new(
        "c2105",
        "DCE",
        dec!(5300),
        2,
        Direction::Sell,
        Offset::Close,
        day(2),
    );
    ctx.correlator()
        .submit(close, Duration::from_secs(5))
        .await
        .unwrap();

    let lots = ctx.ledger().contracts("c2105", "DCE", Direction::Buy).await;
    assert_eq!(lots.len(), 3);
    assert_eq!(lots.iter().filter(|l| !l.is_open()).count(), 2);
    assert_eq!(
        ctx.ledger()
            .count_open_contracts("c2105", "DCE", Direction::Buy, day(3))
            .await,
        1
    );

    let names = ctx.ledger().contract_names().await;
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].instrument_id, "c2105");
}

#[tokio::test]
async fn test_context_property_roundtrip() {
    let _ = env_logger::try_init();
    let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
    let ctx = Context::new(FillingExecution::new(), Arc::new(IdleDatafeed), store);

    ctx.set_property("strategy.lookback", "20").await.unwrap();
    assert_eq!(
        ctx.property("strategy.lookback").await.unwrap().as_deref(),
        Some("20")
    );
}
