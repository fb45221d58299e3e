use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A level-1 market data snapshot for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tick {
    pub id: String,
    pub instrument_id: String,
    pub exchange_id: String,
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    /// Last traded price
    pub last_price: Decimal,
    pub settle_price: Decimal,
    pub pre_settle_price: Decimal,
    pub ask_price: Decimal,
    pub bid_price: Decimal,
    pub ask_volume: u64,
    pub bid_volume: u64,
    pub trade_volume: u64,
    pub open_interest: u64,
    pub trading_day: NaiveDate,
    pub update_time: DateTime<Utc>,
}
