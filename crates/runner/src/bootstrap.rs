//! Platform bootstrap
//!
//! The `Platform` is the host-process assembly: it wires a [`Context`]
//! over the injected transports and store, owns the lifecycle
//! dispatcher, and drives transport start/stop. Strategies registered
//! before `start` receive the full lifecycle from the first event on.
//!
//! The datafeed's lifecycle stream drives strategies; the execution
//! transport's stream is only logged, so each strategy sees every event
//! exactly once.

use async_trait::async_trait;
use hermes_engine::{Context, LifecycleDispatcher, Strategy};
use hermes_ports::{
    DurableStore, ExecutionTransport, LifecycleEvent, LifecycleListener, MarketDataTransport,
};
use log::{error, info};
use std::sync::Arc;
use std::sync::Mutex;

/// Where the platform is in its start/stop cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformStatus {
    Stopped,
    Started,
    StartFailed,
    StopFailed,
}

/// Lifecycle listener for the execution transport: events are logged
/// but not dispatched, since the datafeed already drives strategies.
struct ExecutionLifecycleLog;

#[async_trait]
impl LifecycleListener for ExecutionLifecycleLog {
    async fn on_lifecycle(&self, event: LifecycleEvent) {
        info!("[BOOT] execution transport reported {:?}", event);
    }
}

/// The assembled trading platform.
pub struct Platform {
    execution: Arc<dyn ExecutionTransport>,
    datafeed: Arc<dyn MarketDataTransport>,
    ctx: Arc<Context>,
    dispatcher: Arc<LifecycleDispatcher>,
    status: Mutex<PlatformStatus>,
}

impl Platform {
    /// Assemble the platform over concrete transports and a store.
    pub fn new(
        execution: Arc<dyn ExecutionTransport>,
        datafeed: Arc<dyn MarketDataTransport>,
        store: Arc<dyn DurableStore>,
    ) -> Self {
        let ctx = Context::new(Arc::clone(&execution), Arc::clone(&datafeed), store);
        let dispatcher = Arc::new(LifecycleDispatcher::new(Arc::clone(&ctx)));
        Self {
            execution,
            datafeed,
            ctx,
            dispatcher,
            status: Mutex::new(PlatformStatus::Stopped),
        }
    }

    /// Register a strategy before starting the platform
    pub fn register(&self, strategy: Arc<dyn Strategy>) {
        info!("[BOOT] registering strategy '{}'", strategy.name());
        self.dispatcher.register(strategy);
    }

    /// Remove all strategies with the given name
    pub fn deregister(&self, name: &str) {
        info!("[BOOT] deregistering strategy '{}'", name);
        self.dispatcher.deregister(name);
    }

    /// The engine context strategies trade through
    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    pub fn status(&self) -> PlatformStatus {
        *self.status.lock().expect("platform status poisoned")
    }

    /// Start both transports. The execution transport comes up first so
    /// positions are queryable by the time market data begins flowing.
    pub async fn start(&self) -> PlatformStatus {
        info!("[BOOT] starting platform");
        let execution_listener: Arc<dyn LifecycleListener> = Arc::new(ExecutionLifecycleLog);
        if let Err(e) = self.execution.start(execution_listener).await {
            error!("[BOOT] execution transport failed to start: {}", e);
            return self.transition(PlatformStatus::StartFailed);
        }

        let datafeed_listener: Arc<dyn LifecycleListener> = self.dispatcher.clone();
        if let Err(e) = self.datafeed.start(datafeed_listener).await {
            error!("[BOOT] market data transport failed to start: {}", e);
            return self.transition(PlatformStatus::StartFailed);
        }

        info!("[BOOT] platform started");
        self.transition(PlatformStatus::Started)
    }

    /// Stop both transports, datafeed first. Both are attempted even if
    /// the first fails.
    pub async fn stop(&self) -> PlatformStatus {
        info!("[BOOT] stopping platform");
        let mut failed = false;

        if let Err(e) = self.datafeed.stop().await {
            error!("[BOOT] market data transport failed to stop: {}", e);
            failed = true;
        }
        if let Err(e) = self.execution.stop().await {
            error!("[BOOT] execution transport failed to stop: {}", e);
            failed = true;
        }

        if failed {
            self.transition(PlatformStatus::StopFailed)
        } else {
            info!("[BOOT] platform stopped");
            self.transition(PlatformStatus::Stopped)
        }
    }

    fn transition(&self, to: PlatformStatus) -> PlatformStatus {
        *self.status.lock().expect("platform status poisoned") = to;
        to
    }
}
