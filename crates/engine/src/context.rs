//! Engine context
//!
//! One explicit object wiring the correlator, ledger, and fan-out over
//! the injected transports and store. Constructed once at startup by the
//! host process and passed to strategy modules and transport adapters;
//! there is no process-wide shared instance.

use crate::correlator::OrderCorrelator;
use crate::feed::MarketFeed;
use crate::ledger::PositionLedger;
use hermes_ports::{DurableStore, ExecutionTransport, MarketDataTransport, StoreError};
use std::sync::Arc;

/// The capabilities a strategy trades through.
pub struct Context {
    correlator: Arc<OrderCorrelator>,
    ledger: Arc<PositionLedger>,
    feed: Arc<MarketFeed>,
    store: Arc<dyn DurableStore>,
}

impl Context {
    /// Wire the core over concrete collaborators. The host constructs the
    /// transports and store however it likes and injects them here.
    pub fn new(
        execution: Arc<dyn ExecutionTransport>,
        datafeed: Arc<dyn MarketDataTransport>,
        store: Arc<dyn DurableStore>,
    ) -> Arc<Self> {
        let ledger = Arc::new(PositionLedger::new(Arc::clone(&store)));
        let correlator = Arc::new(OrderCorrelator::new(
            execution,
            Arc::clone(&store),
            Arc::clone(&ledger),
        ));
        let feed = Arc::new(MarketFeed::new(datafeed));
        Arc::new(Self {
            correlator,
            ledger,
            feed,
            store,
        })
    }

    /// Order submission
    pub fn correlator(&self) -> &Arc<OrderCorrelator> {
        &self.correlator
    }

    /// Open/closed lot queries
    pub fn ledger(&self) -> &Arc<PositionLedger> {
        &self.ledger
    }

    /// Market data subscriptions
    pub fn feed(&self) -> &Arc<MarketFeed> {
        &self.feed
    }

    /// Read a configuration property persisted alongside business data
    pub async fn property(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.store.property(key).await
    }

    /// Persist a configuration property
    pub async fn set_property(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.store.set_property(key, value).await
    }
}
