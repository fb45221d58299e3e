//! Failure-injecting store wrapper for tests
//!
//! Wraps a `MemoryStore` and fails every operation while the switch is
//! on. Engine tests use it to assert the logged-degradation policy: a
//! persistence failure never propagates to callers.

use crate::MemoryStore;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use hermes_core::{Contract, ContractName, Order, Trade};
use hermes_ports::{ContractFilter, DurableStore, StoreError};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            failing: AtomicBool::new(false),
        }
    }

    /// Turn failure injection on or off
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// The wrapped store, for asserting what did or did not land
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for FlakyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DurableStore for FlakyStore {
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError> {
        self.check()?;
        self.inner.insert_order(order).await
    }

    async fn insert_trade(&self, trade: &Trade) -> Result<(), StoreError> {
        self.check()?;
        self.inner.insert_trade(trade).await
    }

    async fn insert_contract(&self, contract: &Contract) -> Result<(), StoreError> {
        self.check()?;
        self.inner.insert_contract(contract).await
    }

    async fn close_contracts(
        &self,
        filter: &ContractFilter,
        price: Decimal,
        close_time: DateTime<Utc>,
        limit: u32,
    ) -> Result<u32, StoreError> {
        self.check()?;
        self.inner
            .close_contracts(filter, price, close_time, limit)
            .await
    }

    async fn contract_names(&self) -> Result<Vec<ContractName>, StoreError> {
        self.check()?;
        self.inner.contract_names().await
    }

    async fn contracts(&self, filter: &ContractFilter) -> Result<Vec<Contract>, StoreError> {
        self.check()?;
        self.inner.contracts(filter).await
    }

    async fn count_contracts(
        &self,
        filter: &ContractFilter,
        before: NaiveDate,
    ) -> Result<u64, StoreError> {
        self.check()?;
        self.inner.count_contracts(filter, before).await
    }

    async fn count_open_contracts(
        &self,
        filter: &ContractFilter,
        before: NaiveDate,
    ) -> Result<u64, StoreError> {
        self.check()?;
        self.inner.count_open_contracts(filter, before).await
    }

    async fn set_property(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.set_property(key, value).await
    }

    async fn property(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        self.inner.property(key).await
    }
}
