//! Hermes Engine
//!
//! The core of the Hermes trading middleware, sitting between pluggable
//! broker/datafeed transports and pluggable strategy modules:
//!
//! - **Order Correlator**: synchronous-looking order submission over the
//!   asynchronous callback-driven execution transport, with two-phase
//!   timeout and cancel-on-timeout recovery
//! - **Position Ledger**: FIFO open/close bookkeeping of one-unit lots
//!   produced by trade fills
//! - **Market Data Fan-out**: per-instrument subscriber registry with
//!   concurrent, fault-isolated broadcast
//! - **Lifecycle Dispatcher**: parallel relay of transport lifecycle
//!   events to strategy modules
//!
//! ## Architecture
//!
//! ```text
//! Strategy ──subscribe──► MarketFeed ◄──ticks── MarketDataTransport
//!    │                                                (collaborator)
//!    │ submit(order, timeout)
//!    ▼
//! OrderCorrelator ──orders──► ExecutionTransport (collaborator)
//!    ▲        │                     │
//!    │        ▼                     │ callbacks (any task)
//!    │   PositionLedger ◄──fills────┘
//!    │        │
//!    └────────┴──────► DurableStore (collaborator)
//! ```
//!
//! Everything external sits behind the `hermes-ports` traits; the host
//! process constructs concrete transports and a store and wires them
//! into a [`Context`] once at startup.

pub mod context;
pub mod correlator;
pub mod error;
pub mod feed;
pub mod ledger;
pub mod lifecycle;

// Re-export main types
pub use context::Context;
pub use correlator::OrderCorrelator;
pub use error::{EngineError, TimeoutPhase};
pub use feed::MarketFeed;
pub use ledger::PositionLedger;
pub use lifecycle::{LifecycleDispatcher, Strategy};
