//! Hermes Store
//!
//! In-memory implementation of the `DurableStore` port. Thread-safe
//! storage over DashMap, suitable for single-process runs and testing;
//! production deployments put a database-backed implementation behind the
//! same trait.

mod flaky;
mod memory;

pub use flaky::FlakyStore;
pub use memory::MemoryStore;
