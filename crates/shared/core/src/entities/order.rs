use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Direction, Offset, OrderStatus};

/// Unique identifier for an order
pub type OrderId = Uuid;

/// A limit order submitted to the execution transport.
///
/// The order is mutable: the correlator owns it for the duration of one
/// submission and persists a snapshot on every status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub instrument_id: String,
    pub exchange_id: String,
    /// Limit price
    pub price: Decimal,
    /// Quantity in lots
    pub quantity: u32,
    pub direction: Direction,
    pub offset: Offset,
    pub status: OrderStatus,
    /// Broker-supplied status detail, set on rejection
    pub status_message: Option<String>,
    pub trading_day: NaiveDate,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new pending order with explicit timestamp
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_time(
        instrument_id: impl Into<String>,
        exchange_id: impl Into<String>,
        price: Decimal,
        quantity: u32,
        direction: Direction,
        offset: Offset,
        trading_day: NaiveDate,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            instrument_id: instrument_id.into(),
            exchange_id: exchange_id.into(),
            price,
            quantity,
            direction,
            offset,
            status: OrderStatus::Pending,
            status_message: None,
            trading_day,
            updated_at: timestamp,
        }
    }

    /// Create a new pending order using current system time
    pub fn new(
        instrument_id: impl Into<String>,
        exchange_id: impl Into<String>,
        price: Decimal,
        quantity: u32,
        direction: Direction,
        offset: Offset,
        trading_day: NaiveDate,
    ) -> Self {
        Self::new_with_time(
            instrument_id,
            exchange_id,
            price,
            quantity,
            direction,
            offset,
            trading_day,
            Utc::now(),
        )
    }

    /// Apply a status transition, stamping the update time
    pub fn set_status(&mut self, status: OrderStatus, timestamp: DateTime<Utc>) {
        self.status = status;
        self.updated_at = timestamp;
    }

    /// Returns true if the order reached a terminal status
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
