//! Hermes Ports
//!
//! Port definitions (traits) for the Hermes trading middleware.
//! These define the boundaries between the core and its collaborators:
//! the execution transport (broker connectivity), the market-data
//! transport, and the durable store. The core is implementable against
//! any conforming provider; no wire format or dynamic loading lives here.

mod error;
mod execution;
mod lifecycle;
mod market_data;
mod store;

pub use error::{HandlerError, StoreError, TransportError};
pub use execution::{ExecutionTransport, OrderEvents};
pub use lifecycle::{LifecycleEvent, LifecycleListener};
pub use market_data::{MarketDataTransport, MarketHandler};
pub use store::{ContractFilter, DurableStore};
