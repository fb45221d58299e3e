use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Direction, TradeId};

/// Unique identifier for a contract lot
pub type ContractId = Uuid;

/// One unit of position resulting from a single trade fill.
///
/// A lot is open while `close_price`/`close_time` are unset and closed once
/// both are stamped. A lot's direction equals the direction of the trade
/// that opened it; only a trade of the opposite direction on the same
/// instrument and exchange closes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    /// The fill that opened this lot
    pub trade_id: TradeId,
    pub instrument_id: String,
    pub exchange_id: String,
    pub direction: Direction,
    pub open_price: Decimal,
    pub close_price: Option<Decimal>,
    /// Trading day the lot was opened under
    pub trading_day: NaiveDate,
    pub close_time: Option<DateTime<Utc>>,
}

impl Contract {
    /// Open a new one-unit lot from a fill
    pub fn open(
        trade_id: TradeId,
        instrument_id: impl Into<String>,
        exchange_id: impl Into<String>,
        direction: Direction,
        open_price: Decimal,
        trading_day: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            trade_id,
            instrument_id: instrument_id.into(),
            exchange_id: exchange_id.into(),
            direction,
            open_price,
            close_price: None,
            trading_day,
            close_time: None,
        }
    }

    /// Returns true while the lot carries open exposure
    pub fn is_open(&self) -> bool {
        self.close_price.is_none() && self.close_time.is_none()
    }

    /// Stamp the lot closed at the given price and time
    pub fn close(&mut self, price: Decimal, time: DateTime<Utc>) {
        self.close_price = Some(price);
        self.close_time = Some(time);
    }

    /// The (instrument, exchange) series this lot belongs to
    pub fn name(&self) -> ContractName {
        ContractName {
            instrument_id: self.instrument_id.clone(),
            exchange_id: self.exchange_id.clone(),
        }
    }
}

/// An (instrument, exchange) pair identifying a distinct tradable series.
///
/// Derived from recorded lots, never stored independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractName {
    pub instrument_id: String,
    pub exchange_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lot_open_close() {
        let day = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
        let mut lot = Contract::open(Uuid::new_v4(), "c2105", "DCE", Direction::Buy, dec!(5230), day);
        assert!(lot.is_open());

        lot.close(dec!(5260), Utc::now());
        assert!(!lot.is_open());
        assert_eq!(lot.close_price, Some(dec!(5260)));
    }
}
