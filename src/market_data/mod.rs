pub mod candle;
pub mod source;

// Re-export the core types for convenient access (e.g. `use crate::market_data::Candle`).
pub use candle::{closes, Candle};
pub use source::{CandleSource, KlineRequest};
