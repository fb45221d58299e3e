//! Order Correlator
//!
//! Gives callers a synchronous-looking `submit` over the asynchronous,
//! callback-driven execution transport. Each submission registers a
//! one-shot completion signal, forwards the order, and suspends until a
//! terminal status arrives or the timeout elapses; on timeout it issues a
//! cancel and waits once more before failing.
//!
//! Every fill reported during a submission is persisted and routed into
//! the position ledger. Submissions are independent: each owns its own
//! session and signal, and callbacks for different orders interleave
//! freely.

use crate::error::{EngineError, TimeoutPhase};
use crate::ledger::PositionLedger;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use hermes_core::{Order, OrderStatus, Trade};
use hermes_ports::{DurableStore, ExecutionTransport, OrderEvents, TransportError};
use log::{error, warn};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use tokio::sync::{Mutex, oneshot};
use tokio::time;

/// Correlates order submissions with the transport callbacks they produce.
pub struct OrderCorrelator {
    transport: Arc<dyn ExecutionTransport>,
    store: Arc<dyn DurableStore>,
    ledger: Arc<PositionLedger>,
}

impl OrderCorrelator {
    pub fn new(
        transport: Arc<dyn ExecutionTransport>,
        store: Arc<dyn DurableStore>,
        ledger: Arc<PositionLedger>,
    ) -> Self {
        Self {
            transport,
            store,
            ledger,
        }
    }

    /// The execution transport's current trading day
    pub fn trading_day(&self) -> NaiveDate {
        self.transport.trading_day()
    }

    /// Submit an order and suspend until it reaches a terminal status.
    ///
    /// Returns the final order snapshot on completion; ACCEPTED is an
    /// intermediate status and does not complete a submission. An outright
    /// transport rejection comes back as a normal return with REJECTED
    /// status, not an error. The only error is [`EngineError::Timeout`],
    /// after the cancel-on-timeout recovery has also run its course.
    pub async fn submit(&self, order: Order, timeout: Duration) -> Result<Order, EngineError> {
        let order_id = order.id;
        let (done_tx, mut done_rx) = oneshot::channel();
        let session = Arc::new(OrderSession {
            order: Mutex::new(order.clone()),
            done: StdMutex::new(Some(done_tx)),
            store: Arc::clone(&self.store),
            ledger: Arc::clone(&self.ledger),
        });

        let events: Arc<dyn OrderEvents> = session.clone();
        if let Err(e) = self.transport.submit_order(&order, events).await {
            // An outright rejection is an order update, not an exception
            warn!("[CORR] transport rejected order {}: {}", order_id, e);
            session.on_error(reject_code(&e), &e.to_string()).await;
            return Ok(session.snapshot().await);
        }

        if time::timeout(timeout, &mut done_rx).await.is_ok() {
            return Ok(session.snapshot().await);
        }

        warn!(
            "[CORR] order {} not terminal after {:?}, cancelling",
            order_id, timeout
        );
        if let Err(e) = self.transport.cancel_order(&order).await {
            warn!("[CORR] cancel request for order {} failed: {}", order_id, e);
        }

        match time::timeout(timeout, &mut done_rx).await {
            // Cancel confirmed; the original submission is what timed out
            Ok(_) => Err(EngineError::Timeout {
                order_id,
                phase: TimeoutPhase::Create,
            }),
            // The broker did not respond to the cancel either
            Err(_) => Err(EngineError::Timeout {
                order_id,
                phase: TimeoutPhase::Cancel,
            }),
        }
    }
}

fn reject_code(error: &TransportError) -> i32 {
    match error {
        TransportError::Rejected { code, .. } => *code,
        _ => -1,
    }
}

/// Per-submission state: the live order snapshot and the one-shot
/// completion signal. Handed to the transport as its event sink.
struct OrderSession {
    order: Mutex<Order>,
    done: StdMutex<Option<oneshot::Sender<()>>>,
    store: Arc<dyn DurableStore>,
    ledger: Arc<PositionLedger>,
}

impl OrderSession {
    async fn snapshot(&self) -> Order {
        self.order.lock().await.clone()
    }

    /// Fire the completion signal; no-op after the first call.
    fn wake(&self) {
        if let Some(tx) = self.done.lock().expect("completion signal poisoned").take() {
            let _ = tx.send(());
        }
    }

    async fn record(&self, update: Order) {
        if let Err(e) = self.store.insert_order(&update).await {
            error!("[CORR] failed to persist order {}: {}", update.id, e);
        }
        let terminal = update.is_terminal();
        *self.order.lock().await = update;
        if terminal {
            self.wake();
        }
    }
}

#[async_trait]
impl OrderEvents for OrderSession {
    async fn on_order(&self, order: Order) {
        self.record(order).await;
    }

    async fn on_trade(&self, trade: Trade) {
        if let Err(e) = self.store.insert_trade(&trade).await {
            error!("[CORR] failed to persist trade {}: {}", trade.id, e);
        }
        self.ledger.apply_trade(&trade).await;
    }

    async fn on_error(&self, code: i32, message: &str) {
        let mut update = self.snapshot().await;
        update.status = OrderStatus::Rejected;
        update.status_message = Some(format!("[{}]{}", code, message));
        update.updated_at = Utc::now();
        self.record(update).await;
    }
}
