// =============================================================================
// Quote orchestration
// =============================================================================
//
// Turns an ordered candle series into a `QuoteSummary`: latest price, the
// 24-candle percent change and the RSI / EMA stack. Pure and deterministic;
// the fetch happens elsewhere.
//
// The "24h" change is an index lookback of 24 candles, not a time lookback.
// The two only coincide for hourly candles.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::SeriesError;
use crate::indicators::{compute_ema, compute_rsi, EMA_FAST, EMA_MID, EMA_SLOW, RSI_PERIOD};
use crate::market_data::{closes, Candle};
use crate::types::{RsiStatus, TrendStatus};

/// Number of candles the 24h change looks back.
pub const CHANGE_LOOKBACK: usize = 24;

/// Indicator values at the latest close. `None` means "not enough data".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub rsi14: Option<f64>,
    pub ema9: Option<f64>,
    pub ema21: Option<f64>,
    pub ema50: Option<f64>,
}

impl IndicatorResult {
    pub fn from_closes(closes: &[f64]) -> Self {
        Self {
            rsi14: compute_rsi(closes, RSI_PERIOD),
            ema9: compute_ema(closes, EMA_FAST),
            ema21: compute_ema(closes, EMA_MID),
            ema50: compute_ema(closes, EMA_SLOW),
        }
    }

    pub fn rsi_status(&self) -> Option<RsiStatus> {
        self.rsi14.map(RsiStatus::classify)
    }

    /// `None` unless all three EMAs are available.
    pub fn trend(&self) -> Option<TrendStatus> {
        Some(TrendStatus::classify(self.ema9?, self.ema21?, self.ema50?))
    }
}

/// Everything shown for one symbol after a single fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub symbol: String,
    pub current_price: f64,
    #[serde(rename = "change24h")]
    pub change_24h: Option<f64>,
    pub indicators: IndicatorResult,
}

/// Signed percent change between the latest close and the close `lookback`
/// candles earlier.
///
/// Returns `None` when the series is too short or the reference price is
/// zero (the ratio would not be finite).
pub fn percent_change(closes: &[f64], lookback: usize) -> Option<f64> {
    let last = closes.len().checked_sub(1)?;
    let past_idx = last.checked_sub(lookback)?;
    let current = closes[last];
    let past = closes[past_idx];

    let change = (current - past) / past * 100.0;
    change.is_finite().then_some(change)
}

/// Build a [`QuoteSummary`] from candles in chronological order.
pub fn build_quote(symbol: &str, candles: &[Candle]) -> Result<QuoteSummary, SeriesError> {
    let closes = closes(candles);
    let current_price = *closes.last().ok_or(SeriesError::EmptySeries)?;

    Ok(QuoteSummary {
        symbol: symbol.to_string(),
        current_price,
        change_24h: percent_change(&closes, CHANGE_LOOKBACK),
        indicators: IndicatorResult::from_closes(&closes),
    })
}
