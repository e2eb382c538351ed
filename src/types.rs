// =============================================================================
// Shared types used across the quote pipeline
// =============================================================================

use serde::{Deserialize, Serialize};

/// Lower RSI threshold; strictly below it the market is oversold.
pub const RSI_OVERSOLD: f64 = 30.0;
/// Upper RSI threshold; strictly above it the market is overbought.
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// Momentum reading derived from an RSI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiStatus {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiStatus {
    pub fn classify(rsi: f64) -> Self {
        if rsi < RSI_OVERSOLD {
            Self::Oversold
        } else if rsi > RSI_OVERBOUGHT {
            Self::Overbought
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for RsiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Oversold => write!(f, "Oversold"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Overbought => write!(f, "Overbought"),
        }
    }
}

/// Trend reading derived from the EMA-9 / EMA-21 / EMA-50 stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStatus {
    StrongUptrend,
    Uptrend,
    Downtrend,
}

impl TrendStatus {
    /// `fast > mid > slow` is a strong uptrend, `fast > mid` alone an uptrend,
    /// everything else (ties included) a downtrend.
    pub fn classify(fast: f64, mid: f64, slow: f64) -> Self {
        if fast > mid && mid > slow {
            Self::StrongUptrend
        } else if fast > mid {
            Self::Uptrend
        } else {
            Self::Downtrend
        }
    }
}

impl std::fmt::Display for TrendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongUptrend => write!(f, "Strong Uptrend"),
            Self::Uptrend => write!(f, "Uptrend"),
            Self::Downtrend => write!(f, "Downtrend"),
        }
    }
}
