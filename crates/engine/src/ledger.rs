//! Position Ledger
//!
//! Owns the set of open and closed lots per instrument+direction. A fill
//! with OPEN offset produces one lot per unit of quantity, all at the
//! fill price; a fill with CLOSE offset closes up to its quantity of open
//! lots of the opposite direction, oldest trading day first.
//!
//! Persistence failures are logged and degrade to empty/zero results
//! rather than propagating: callers must treat "no data" as a possible
//! transient outcome, not proof of an empty book.

use chrono::{DateTime, NaiveDate, Utc};
use hermes_core::{Contract, ContractName, Direction, Offset, Trade};
use hermes_ports::{ContractFilter, DurableStore};
use log::{error, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;

/// FIFO lot bookkeeping over the durable store.
pub struct PositionLedger {
    store: Arc<dyn DurableStore>,
    // Serializes open/close across concurrent order flows. Lot volumes are
    // small relative to network latency, so one lock is enough.
    write_lock: Mutex<()>,
}

impl PositionLedger {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Route a fill into the ledger: OPEN offset opens lots, CLOSE offset
    /// closes lots of the opposite direction on the same series.
    pub async fn apply_trade(&self, trade: &Trade) {
        match trade.offset {
            Offset::Open => self.open_lots(trade).await,
            Offset::Close => {
                self.close_lots(
                    &trade.instrument_id,
                    &trade.exchange_id,
                    trade.direction.opposite(),
                    trade.price,
                    trade.quantity,
                    trade.executed_at,
                )
                .await;
            }
        }
    }

    /// Create `trade.quantity` one-unit lots at the fill price.
    pub async fn open_lots(&self, trade: &Trade) {
        let _guard = self.write_lock.lock().await;
        for _ in 0..trade.quantity {
            let lot = Contract::open(
                trade.id,
                &trade.instrument_id,
                &trade.exchange_id,
                trade.direction,
                trade.price,
                trade.trading_day,
            );
            if let Err(e) = self.store.insert_contract(&lot).await {
                error!(
                    "[LEDGER] failed to persist lot {} for trade {}: {}",
                    lot.id, trade.id, e
                );
            }
        }
    }

    /// Close up to `quantity` open lots matching the series and direction,
    /// oldest trading day first. Returns how many were actually closed;
    /// fewer open lots than requested is a reconciliation gap, not an
    /// error.
    pub async fn close_lots(
        &self,
        instrument_id: &str,
        exchange_id: &str,
        direction: Direction,
        price: Decimal,
        quantity: u32,
        close_time: DateTime<Utc>,
    ) -> u32 {
        let _guard = self.write_lock.lock().await;
        let filter = ContractFilter::new(instrument_id, exchange_id, direction);
        match self
            .store
            .close_contracts(&filter, price, close_time, quantity)
            .await
        {
            Ok(closed) => {
                if closed < quantity {
                    warn!(
                        "[LEDGER] close requested {} lots but only {} open for {}/{} {:?}",
                        quantity, closed, instrument_id, exchange_id, direction
                    );
                }
                closed
            }
            Err(e) => {
                error!(
                    "[LEDGER] failed to close lots for {}/{} {:?}: {}",
                    instrument_id, exchange_id, direction, e
                );
                0
            }
        }
    }

    /// Distinct (instrument, exchange) pairs with any recorded lot
    pub async fn contract_names(&self) -> Vec<ContractName> {
        match self.store.contract_names().await {
            Ok(names) => names,
            Err(e) => {
                error!("[LEDGER] failed to query contract names: {}", e);
                Vec::new()
            }
        }
    }

    /// All lots, open and closed, for one series and direction
    pub async fn contracts(
        &self,
        instrument_id: &str,
        exchange_id: &str,
        direction: Direction,
    ) -> Vec<Contract> {
        let filter = ContractFilter::new(instrument_id, exchange_id, direction);
        match self.store.contracts(&filter).await {
            Ok(contracts) => contracts,
            Err(e) => {
                error!(
                    "[LEDGER] failed to query lots for {}/{} {:?}: {}",
                    instrument_id, exchange_id, direction, e
                );
                Vec::new()
            }
        }
    }

    /// Count lots with trading day strictly before `before`
    pub async fn count_contracts(
        &self,
        instrument_id: &str,
        exchange_id: &str,
        direction: Direction,
        before: NaiveDate,
    ) -> u64 {
        let filter = ContractFilter::new(instrument_id, exchange_id, direction);
        match self.store.count_contracts(&filter, before).await {
            Ok(count) => count,
            Err(e) => {
                error!(
                    "[LEDGER] failed to count lots for {}/{} {:?}: {}",
                    instrument_id, exchange_id, direction, e
                );
                0
            }
        }
    }

    /// Count still-open lots with trading day strictly before `before`
    pub async fn count_open_contracts(
        &self,
        instrument_id: &str,
        exchange_id: &str,
        direction: Direction,
        before: NaiveDate,
    ) -> u64 {
        let filter = ContractFilter::new(instrument_id, exchange_id, direction);
        match self.store.count_open_contracts(&filter, before).await {
            Ok(count) => count,
            Err(e) => {
                error!(
                    "[LEDGER] failed to count open lots for {}/{} {:?}: {}",
                    instrument_id, exchange_id, direction, e
                );
                0
            }
        }
    }
}
