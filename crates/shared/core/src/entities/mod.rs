//! Trading entities: orders, trades, and position lots.

mod contract;
mod direction;
mod offset;
mod order;
mod order_status;
mod trade;

pub use contract::{Contract, ContractId, ContractName};
pub use direction::Direction;
pub use offset::Offset;
pub use order::{Order, OrderId};
pub use order_status::OrderStatus;
pub use trade::{Trade, TradeId};
