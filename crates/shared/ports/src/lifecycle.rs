//! Transport lifecycle port

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Lifecycle transitions reported by a transport.
///
/// `Start`/`Stop` bracket the transport process; `Open`/`Close` bracket a
/// trading session within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Start,
    Open,
    Close,
    Stop,
}

/// Receiver of transport lifecycle events.
#[async_trait]
pub trait LifecycleListener: Send + Sync {
    async fn on_lifecycle(&self, event: LifecycleEvent);
}
