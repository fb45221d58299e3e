use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An aggregated OHLC bar for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub id: String,
    pub instrument_id: String,
    pub exchange_id: String,
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub close_price: Decimal,
    pub trade_volume: u64,
    pub open_interest: u64,
    /// Bar period in minutes
    pub period_minutes: u32,
    pub trading_day: NaiveDate,
    pub update_time: DateTime<Utc>,
}
