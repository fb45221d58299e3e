//! In-memory durable store

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use hermes_core::{Contract, ContractId, ContractName, Order, OrderId, Trade, TradeId};
use hermes_ports::{ContractFilter, DurableStore, StoreError};
use rust_decimal::Decimal;
use std::sync::Mutex;

/// A contract row plus the insertion sequence used as the FIFO tie-break
/// for lots sharing a trading day.
#[derive(Debug, Clone)]
struct ContractRow {
    sequence: u64,
    contract: Contract,
}

/// In-memory `DurableStore`.
///
/// Orders and trades are keyed by id; every insert of the same order id
/// overwrites the previous snapshot, which is what "persist on every
/// status transition" needs. Contracts live in one sequenced table so
/// close-out selection can order by (trading day, insertion sequence).
pub struct MemoryStore {
    orders: DashMap<OrderId, Order>,
    trades: DashMap<TradeId, Trade>,
    contracts: Mutex<Vec<ContractRow>>,
    properties: DashMap<String, String>,
    next_sequence: Mutex<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
            trades: DashMap::new(),
            contracts: Mutex::new(Vec::new()),
            properties: DashMap::new(),
            next_sequence: Mutex::new(0),
        }
    }

    /// Latest persisted snapshot of an order
    pub fn order(&self, id: &OrderId) -> Option<Order> {
        self.orders.get(id).map(|o| o.clone())
    }

    /// A persisted trade by id
    pub fn trade(&self, id: &TradeId) -> Option<Trade> {
        self.trades.get(id).map(|t| t.clone())
    }

    /// A persisted lot by id
    pub fn contract(&self, id: &ContractId) -> Option<Contract> {
        let rows = self.contracts.lock().expect("contract table poisoned");
        rows.iter()
            .find(|r| r.contract.id == *id)
            .map(|r| r.contract.clone())
    }

    fn allocate_sequence(&self) -> u64 {
        let mut next = self.next_sequence.lock().expect("sequence poisoned");
        let seq = *next;
        *next += 1;
        seq
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError> {
        self.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn insert_trade(&self, trade: &Trade) -> Result<(), StoreError> {
        self.trades.insert(trade.id, trade.clone());
        Ok(())
    }

    async fn insert_contract(&self, contract: &Contract) -> Result<(), StoreError> {
        let sequence = self.allocate_sequence();
        let mut rows = self.contracts.lock().expect("contract table poisoned");
        rows.push(ContractRow {
            sequence,
            contract: contract.clone(),
        });
        Ok(())
    }

    async fn close_contracts(
        &self,
        filter: &ContractFilter,
        price: Decimal,
        close_time: DateTime<Utc>,
        limit: u32,
    ) -> Result<u32, StoreError> {
        let mut rows = self.contracts.lock().expect("contract table poisoned");

        // Oldest trading day first, insertion order within a day
        let mut open: Vec<(usize, NaiveDate, u64)> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.contract.is_open() && filter.matches(&r.contract))
            .map(|(i, r)| (i, r.contract.trading_day, r.sequence))
            .collect();
        open.sort_by_key(|(_, day, seq)| (*day, *seq));

        let mut closed = 0u32;
        for (index, _, _) in open.into_iter().take(limit as usize) {
            rows[index].contract.close(price, close_time);
            closed += 1;
        }
        Ok(closed)
    }

    async fn contract_names(&self) -> Result<Vec<ContractName>, StoreError> {
        let rows = self.contracts.lock().expect("contract table poisoned");
        let mut names: Vec<ContractName> = Vec::new();
        for row in rows.iter() {
            let name = row.contract.name();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    async fn contracts(&self, filter: &ContractFilter) -> Result<Vec<Contract>, StoreError> {
        let rows = self.contracts.lock().expect("contract table poisoned");
        Ok(rows
            .iter()
            .filter(|r| filter.matches(&r.contract))
            .map(|r| r.contract.clone())
            .collect())
    }

    async fn count_contracts(
        &self,
        filter: &ContractFilter,
        before: NaiveDate,
    ) -> Result<u64, StoreError> {
        let rows = self.contracts.lock().expect("contract table poisoned");
        Ok(rows
            .iter()
            .filter(|r| filter.matches(&r.contract) && r.contract.trading_day < before)
            .count() as u64)
    }

    async fn count_open_contracts(
        &self,
        filter: &ContractFilter,
        before: NaiveDate,
    ) -> Result<u64, StoreError> {
        let rows = self.contracts.lock().expect("contract table poisoned");
        Ok(rows
            .iter()
            .filter(|r| {
                r.contract.is_open()
                    && filter.matches(&r.contract)
                    && r.contract.trading_day < before
            })
            .count() as u64)
    }

    async fn set_property(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.properties.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn property(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.properties.get(key).map(|v| v.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_core::Direction;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
    }

    fn open_lot(instrument: &str, direction: Direction, trading_day: NaiveDate) -> Contract {
        Contract::open(
            Uuid::new_v4(),
            instrument,
            "DCE",
            direction,
            dec!(5230),
            trading_day,
        )
    }

    #[tokio::test]
    async fn test_close_selects_oldest_trading_day_first() {
        let store = MemoryStore::new();
        let newer = open_lot("c2105", Direction::Buy, day(2));
        let older = open_lot("c2105", Direction::Buy, day(1));
        store.insert_contract(&newer).await.unwrap();
        store.insert_contract(&older).await.unwrap();

        let filter = ContractFilter::new("c2105", "DCE", Direction::Buy);
        let closed = store
            .close_contracts(&filter, dec!(5300), Utc::now(), 1)
            .await
            .unwrap();
        assert_eq!(closed, 1);

        assert!(!store.contract(&older.id).unwrap().is_open());
        assert!(store.contract(&newer.id).unwrap().is_open());
    }

    #[tokio::test]
    async fn test_close_ties_break_by_insertion_order() {
        let store = MemoryStore::new();
        let first = open_lot("c2105", Direction::Buy, day(1));
        let second = open_lot("c2105", Direction::Buy, day(1));
        store.insert_contract(&first).await.unwrap();
        store.insert_contract(&second).await.unwrap();

        let filter = ContractFilter::new("c2105", "DCE", Direction::Buy);
        store
            .close_contracts(&filter, dec!(5300), Utc::now(), 1)
            .await
            .unwrap();

        assert!(!store.contract(&first.id).unwrap().is_open());
        assert!(store.contract(&second.id).unwrap().is_open());
    }

    #[tokio::test]
    async fn test_close_more_than_available() {
        let store = MemoryStore::new();
        for _ in 0..2 {
            store
                .insert_contract(&open_lot("c2105", Direction::Buy, day(1)))
                .await
                .unwrap();
        }

        let filter = ContractFilter::new("c2105", "DCE", Direction::Buy);
        let closed = store
            .close_contracts(&filter, dec!(5300), Utc::now(), 5)
            .await
            .unwrap();
        assert_eq!(closed, 2);
    }

    #[tokio::test]
    async fn test_close_ignores_other_direction() {
        let store = MemoryStore::new();
        store
            .insert_contract(&open_lot("c2105", Direction::Sell, day(1)))
            .await
            .unwrap();

        let filter = ContractFilter::new("c2105", "DCE", Direction::Buy);
        let closed = store
            .close_contracts(&filter, dec!(5300), Utc::now(), 1)
            .await
            .unwrap();
        assert_eq!(closed, 0);
    }

    #[tokio::test]
    async fn test_contract_names_distinct() {
        let store = MemoryStore::new();
        store
            .insert_contract(&open_lot("c2105", Direction::Buy, day(1)))
            .await
            .unwrap();
        store
            .insert_contract(&open_lot("c2105", Direction::Sell, day(1)))
            .await
            .unwrap();
        store
            .insert_contract(&open_lot("rb2110", Direction::Buy, day(1)))
            .await
            .unwrap();

        let names = store.contract_names().await.unwrap();
        assert_eq!(names.len(), 2);
    }

    #[tokio::test]
    async fn test_counts_use_strict_before() {
        let store = MemoryStore::new();
        store
            .insert_contract(&open_lot("c2105", Direction::Buy, day(1)))
            .await
            .unwrap();
        store
            .insert_contract(&open_lot("c2105", Direction::Buy, day(3)))
            .await
            .unwrap();

        let filter = ContractFilter::new("c2105", "DCE", Direction::Buy);
        assert_eq!(store.count_contracts(&filter, day(3)).await.unwrap(), 1);
        assert_eq!(store.count_contracts(&filter, day(4)).await.unwrap(), 2);
        assert_eq!(
            store.count_open_contracts(&filter, day(4)).await.unwrap(),
            2
        );

        store
            .close_contracts(&filter, dec!(5300), Utc::now(), 1)
            .await
            .unwrap();
        assert_eq!(
            store.count_open_contracts(&filter, day(4)).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_property_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.property("mode").await.unwrap(), None);
        store.set_property("mode", "paper").await.unwrap();
        assert_eq!(
            store.property("mode").await.unwrap(),
            Some("paper".to_string())
        );
    }

    #[tokio::test]
    async fn test_order_insert_overwrites_snapshot() {
        use hermes_core::{Offset, OrderStatus};

        let store = MemoryStore::new();
        let mut order = Order::new(
            "c2105",
            "DCE",
            dec!(5230),
            1,
            Direction::Buy,
            Offset::Open,
            day(1),
        );
        store.insert_order(&order).await.unwrap();

        order.set_status(OrderStatus::Filled, Utc::now());
        store.insert_order(&order).await.unwrap();

        assert_eq!(store.order(&order.id).unwrap().status, OrderStatus::Filled);
    }
}
