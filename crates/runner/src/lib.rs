//! Hermes Runner
//!
//! Host-process bootstrap for the Hermes trading middleware:
//!
//! - **Config**: file-based runner configuration
//! - **Bootstrap**: the `Platform`, which constructs the engine context
//!   over injected transports and store, registers strategies, and drives
//!   transport start/stop
//! - **Simulation**: in-process paper transports for demos and tests
//!
//! The host owns all construction: it builds concrete transport and
//! strategy objects (however sourced) and injects them through the
//! narrow `hermes-ports` traits. The core never loads plugins itself.

pub mod bootstrap;
pub mod config;
pub mod simulation;

// Re-export main types
pub use bootstrap::{Platform, PlatformStatus};
pub use config::{ConfigError, RunnerConfig};
pub use simulation::{SimulatedExecution, SimulatedFeed};
