use serde::{Deserialize, Serialize};

/// Whether a trade opens new exposure or reduces existing exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Offset {
    /// Opens new position lots
    Open,
    /// Closes existing lots of the opposite direction
    Close,
}
