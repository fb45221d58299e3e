//! Durable store port
//!
//! Simple insert/query/update operations keyed by business identifiers.
//! The physical engine behind this trait is an external collaborator; the
//! core only assumes the operations below.

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use hermes_core::{Contract, ContractName, Direction, Order, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Filter selecting lots of one instrument+exchange+direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFilter {
    pub instrument_id: String,
    pub exchange_id: String,
    pub direction: Direction,
}

impl ContractFilter {
    pub fn new(
        instrument_id: impl Into<String>,
        exchange_id: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            exchange_id: exchange_id.into(),
            direction,
        }
    }

    /// Returns true if the lot matches this filter
    pub fn matches(&self, contract: &Contract) -> bool {
        contract.instrument_id == self.instrument_id
            && contract.exchange_id == self.exchange_id
            && contract.direction == self.direction
    }
}

/// Persistence operations the core depends on.
///
/// `close_contracts` must select open lots ordered by ascending trading
/// day, tie-broken by insertion order (an auto-increment key in a SQL
/// store), so FIFO close-out is deterministic across implementations.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError>;

    async fn insert_trade(&self, trade: &Trade) -> Result<(), StoreError>;

    async fn insert_contract(&self, contract: &Contract) -> Result<(), StoreError>;

    /// Stamp close price/time on up to `limit` open lots matching `filter`,
    /// oldest trading day first. Returns the number of lots actually
    /// closed; fewer than `limit` is not an error.
    async fn close_contracts(
        &self,
        filter: &ContractFilter,
        price: Decimal,
        close_time: DateTime<Utc>,
        limit: u32,
    ) -> Result<u32, StoreError>;

    /// Distinct (instrument, exchange) pairs with any recorded lot
    async fn contract_names(&self) -> Result<Vec<ContractName>, StoreError>;

    /// All lots, open and closed, matching `filter`
    async fn contracts(&self, filter: &ContractFilter) -> Result<Vec<Contract>, StoreError>;

    /// Count lots with trading day strictly before `before`
    async fn count_contracts(
        &self,
        filter: &ContractFilter,
        before: NaiveDate,
    ) -> Result<u64, StoreError>;

    /// Count still-open lots with trading day strictly before `before`
    async fn count_open_contracts(
        &self,
        filter: &ContractFilter,
        before: NaiveDate,
    ) -> Result<u64, StoreError>;

    /// Persist a configuration property alongside business data
    async fn set_property(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Read back a configuration property
    async fn property(&self, key: &str) -> Result<Option<String>, StoreError>;
}
