// =============================================================================
// Error taxonomy
// =============================================================================
//
// Series-level problems (empty or malformed candle data) abort a quote.
// Upstream failures are kept separate so the API layer can tell "Binance is
// unreachable" apart from "Binance sent something we cannot compute on".
// Insufficient data for a single indicator is NOT an error; see `indicators`.
// =============================================================================

use thiserror::Error;

/// Problems with the shape or content of a candle series.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    #[error("close price series is empty")]
    EmptySeries,
    #[error("kline payload is not a JSON array")]
    NotAnArray,
    #[error("kline entry {index} is malformed: {reason}")]
    MalformedCandle { index: usize, reason: String },
}

/// Failures at the candle source boundary.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode upstream payload: {0}")]
    Decode(String),
}

/// Rejected request parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("symbol must be non-empty ASCII alphanumeric: '{0}'")]
    InvalidSymbol(String),
    #[error("unsupported interval '{0}'")]
    InvalidInterval(String),
    #[error("limit {value} out of range 1..={max}")]
    InvalidLimit { value: u32, max: u32 },
}

/// Everything that can abort a full quote computation.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Series(#[from] SeriesError),
}
