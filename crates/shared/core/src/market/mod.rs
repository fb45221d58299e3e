//! Market data events delivered through the fan-out layer.

mod candle;
mod tick;

pub use candle::Candle;
pub use tick::Tick;
