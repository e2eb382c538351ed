// =============================================================================
// Candle source boundary
// =============================================================================
//
// A `CandleSource` hands back the exchange's raw kline payload; parsing and
// shape validation happen on our side of the seam so every source is held to
// the same rules.
// =============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{QuoteError, RequestError, SourceError};
use crate::market_data::candle::{parse_klines, Candle};

/// Binance kline interval codes accepted by `/api/v3/klines`.
pub const SUPPORTED_INTERVALS: &[&str] = &[
    "1s", "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w",
    "1M",
];

/// Upper bound Binance accepts for `limit`.
pub const MAX_LIMIT: u32 = 1000;

pub const DEFAULT_SYMBOL: &str = "BTCUSDT";
pub const DEFAULT_INTERVAL: &str = "1h";
pub const DEFAULT_LIMIT: u32 = 100;

/// Parameters for a single kline fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KlineRequest {
    pub symbol: String,
    pub interval: String,
    pub limit: u32,
}

impl Default for KlineRequest {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            interval: DEFAULT_INTERVAL.to_string(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl KlineRequest {
    /// Normalise and check the request. The symbol is upper-cased.
    pub fn validate(mut self) -> Result<Self, RequestError> {
        self.symbol = self.symbol.trim().to_uppercase();
        if self.symbol.is_empty() || !self.symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RequestError::InvalidSymbol(self.symbol));
        }

        if !SUPPORTED_INTERVALS.contains(&self.interval.as_str()) {
            return Err(RequestError::InvalidInterval(self.interval));
        }

        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(RequestError::InvalidLimit {
                value: self.limit,
                max: MAX_LIMIT,
            });
        }

        Ok(self)
    }
}

/// Anything that can supply an ordered OHLCV series for a symbol.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetch the raw kline payload exactly as the exchange returned it.
    async fn fetch_raw(&self, req: &KlineRequest) -> Result<Value, SourceError>;

    /// Fetch and parse candles. Malformed payloads are rejected as a whole.
    async fn fetch_candles(&self, req: &KlineRequest) -> Result<Vec<Candle>, QuoteError> {
        let raw = self.fetch_raw(req).await?;
        Ok(parse_klines(&raw)?)
    }
}
