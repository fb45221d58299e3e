//! Lifecycle Dispatcher
//!
//! Relays transport lifecycle events (start/open/close/stop) to every
//! registered strategy module in parallel, with the same per-task fault
//! isolation as the market-data fan-out: one strategy's failure is
//! logged and never reaches the others or the transport.

use crate::context::Context;
use async_trait::async_trait;
use hermes_ports::{HandlerError, LifecycleEvent, LifecycleListener};
use log::{error, info};
use std::sync::{Arc, RwLock};
use tokio::task::JoinSet;

/// A trading strategy module.
///
/// Strategies receive lifecycle events here, market data through the
/// [`MarketHandler`](hermes_ports::MarketHandler) they register with the
/// feed, and trade through the context's correlator. All methods default
/// to no-ops so a strategy implements only what it needs.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Strategy name for logging
    fn name(&self) -> &str;

    /// The transport process came up; positions are queryable
    async fn on_start(&self, _ctx: &Context) -> Result<(), HandlerError> {
        Ok(())
    }

    /// A trading session opened; submission and subscription are live
    async fn on_open(&self, _ctx: &Context) -> Result<(), HandlerError> {
        Ok(())
    }

    /// The trading session closed
    async fn on_close(&self) -> Result<(), HandlerError> {
        Ok(())
    }

    /// The transport process is going down
    async fn on_stop(&self) -> Result<(), HandlerError> {
        Ok(())
    }
}

/// Broadcasts lifecycle events to registered strategies.
pub struct LifecycleDispatcher {
    ctx: Arc<Context>,
    strategies: RwLock<Vec<Arc<dyn Strategy>>>,
}

impl LifecycleDispatcher {
    pub fn new(ctx: Arc<Context>) -> Self {
        Self {
            ctx,
            strategies: RwLock::new(Vec::new()),
        }
    }

    /// Register a strategy for lifecycle delivery
    pub fn register(&self, strategy: Arc<dyn Strategy>) {
        self.strategies
            .write()
            .expect("strategy registry poisoned")
            .push(strategy);
    }

    /// Remove all strategies with the given name
    pub fn deregister(&self, name: &str) {
        self.strategies
            .write()
            .expect("strategy registry poisoned")
            .retain(|s| s.name() != name);
    }

    /// Number of registered strategies
    pub fn len(&self) -> usize {
        self.strategies
            .read()
            .expect("strategy registry poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver one event to every strategy in parallel.
    pub async fn dispatch(&self, event: LifecycleEvent) {
        let snapshot = self
            .strategies
            .read()
            .expect("strategy registry poisoned")
            .clone();

        let mut tasks = JoinSet::new();
        for strategy in snapshot {
            let ctx = Arc::clone(&self.ctx);
            tasks.spawn(async move {
                let name = strategy.name().to_string();
                let outcome = match event {
                    LifecycleEvent::Start => strategy.on_start(&ctx).await,
                    LifecycleEvent::Open => strategy.on_open(&ctx).await,
                    LifecycleEvent::Close => strategy.on_close().await,
                    LifecycleEvent::Stop => strategy.on_stop().await,
                };
                (name, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(()))) => {}
                Ok((name, Err(e))) => {
                    error!("[LIFE] strategy '{}' failed on {:?}: {}", name, event, e)
                }
                Err(e) => error!("[LIFE] strategy panicked on {:?}: {}", event, e),
            }
        }
    }
}

#[async_trait]
impl LifecycleListener for LifecycleDispatcher {
    async fn on_lifecycle(&self, event: LifecycleEvent) {
        info!("[LIFE] transport reported {:?}", event);
        self.dispatch(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hermes_core::Order;
    use hermes_ports::{
        DurableStore, ExecutionTransport, MarketDataTransport, MarketHandler, OrderEvents,
        TransportError,
    };
    use hermes_store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct IdleExecution;

    #[async_trait]
    impl ExecutionTransport for IdleExecution {
        async fn submit_order(
            &self,
            _order: &Order,
            _events: Arc<dyn OrderEvents>,
        ) -> Result<(), TransportError> {
            Ok(())
        }

        async fn cancel_order(&self, _order: &Order) -> Result<(), TransportError> {
            Ok(())
        }

        async fn start(
            &self,
            _listener: Arc<dyn LifecycleListener>,
        ) -> Result<(), TransportError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), TransportError> {
            Ok(())
        }

        fn trading_day(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2021, 3, 15).unwrap()
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

        async fn start(
            &self,
            _listener: Arc<dyn LifecycleListener>,
        ) -> Result<(), TransportError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), TransportError> {
            Ok(())
        }

        fn trading_day(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2021, 3, 15).unwrap()
        }
    }

    fn test_context() -> Arc<Context> {
        let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
        Context::new(Arc::new(IdleExecution), Arc::new(IdleDatafeed), store)
    }

    struct RecordingStrategy {
        name: String,
        opens: AtomicUsize,
        stops: AtomicUsize,
        fail_open: bool,
    }

    impl RecordingStrategy {
        fn new(name: &str, fail_open: bool) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                opens: AtomicUsize::new(0),
                stops: AtomicUsize::new(0),
                fail_open,
            })
        }
    }

    #[async_trait]
    impl Strategy for RecordingStrategy {
        fn name(&self) -> &str {
            &self.name
        }

        async fn on_open(&self, _ctx: &Context) -> Result<(), HandlerError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if self.fail_open {
                return Err(HandlerError::new("boot failure"));
            }
            Ok(())
        }

        async fn on_stop(&self) -> Result<(), HandlerError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failing_strategy_does_not_block_others() {
        let dispatcher = LifecycleDispatcher::new(test_context());
        let bad = RecordingStrategy::new("bad", true);
        let good = RecordingStrategy::new("good", false);
        dispatcher.register(bad.clone());
        dispatcher.register(good.clone());

        dispatcher.on_lifecycle(LifecycleEvent::Open).await;

        assert_eq!(bad.opens.load(Ordering::SeqCst), 1);
        assert_eq!(good.opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_deregister_by_name() {
        let dispatcher = LifecycleDispatcher::new(test_context());
        let one = RecordingStrategy::new("one", false);
        let two = RecordingStrategy::new("two", false);
        dispatcher.register(one.clone());
        dispatcher.register(two.clone());
        assert_eq!(dispatcher.len(), 2);

        dispatcher.deregister("one");
        dispatcher.dispatch(LifecycleEvent::Stop).await;

        assert_eq!(one.stops.load(Ordering::SeqCst), 0);
        assert_eq!(two.stops.load(Ordering::SeqCst), 1);
    }
}
