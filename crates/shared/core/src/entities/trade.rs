use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Direction, Offset, OrderId};

/// Unique identifier for a trade
pub type TradeId = Uuid;

/// A fill reported by the execution transport.
///
/// Immutable once created; one order may generate zero or more trades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    /// The order this fill belongs to
    pub order_id: OrderId,
    pub instrument_id: String,
    pub exchange_id: String,
    /// Fill price
    pub price: Decimal,
    /// Fill quantity in lots
    pub quantity: u32,
    pub direction: Direction,
    pub offset: Offset,
    pub trading_day: NaiveDate,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Create a trade with explicit timestamp
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_time(
        order_id: OrderId,
        instrument_id: impl Into<String>,
        exchange_id: impl Into<String>,
        price: Decimal,
        quantity: u32,
        direction: Direction,
        offset: Offset,
        trading_day: NaiveDate,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            instrument_id: instrument_id.into(),
            exchange_id: exchange_id.into(),
            price,
            quantity,
            direction,
            offset,
            trading_day,
            executed_at,
        }
    }
}
