//! Hermes Core Domain
//!
//! Pure domain types for the Hermes trading middleware.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod market;

// Re-export commonly used types at crate root
pub use entities::{
    Contract,
    ContractId,
    ContractName,
    Direction,
    Offset,
    // Core trading entities
    Order,
    OrderId,
    OrderStatus,
    Trade,
    TradeId,
};
pub use market::{Candle, Tick};
