use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SeriesError;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV candle parsed from a Binance kline record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Minimum number of positional fields a kline record must carry:
///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume
pub const KLINE_MIN_FIELDS: usize = 6;

/// Closing prices in chronological order (index 0 is the oldest candle).
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse Binance's array-of-arrays kline payload into [`Candle`]s.
///
/// The whole payload is rejected on the first malformed entry; callers never
/// see a partially parsed series. Numeric fields may arrive either as JSON
/// strings (Binance's format) or as plain numbers.
pub fn parse_klines(payload: &Value) -> Result<Vec<Candle>, SeriesError> {
    let raw = payload.as_array().ok_or(SeriesError::NotAnArray)?;

    raw.iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_entry(entry).map_err(|reason| SeriesError::MalformedCandle { index, reason })
        })
        .collect()
}

fn parse_entry(entry: &Value) -> Result<Candle, String> {
    let arr = entry.as_array().ok_or_else(|| "entry is not an array".to_string())?;

    if arr.len() < KLINE_MIN_FIELDS {
        return Err(format!(
            "expected at least {KLINE_MIN_FIELDS} fields, got {}",
            arr.len()
        ));
    }

    let open_ms = parse_i64(&arr[0]).ok_or_else(|| format!("invalid open time: {}", arr[0]))?;
    let open_time = DateTime::<Utc>::from_timestamp_millis(open_ms)
        .ok_or_else(|| format!("open time {open_ms} out of range"))?;

    Ok(Candle {
        open_time,
        open: parse_f64(&arr[1], "open")?,
        high: parse_f64(&arr[2], "high")?,
        low: parse_f64(&arr[3], "low")?,
        close: parse_f64(&arr[4], "close")?,
        volume: parse_f64(&arr[5], "volume")?,
    })
}

/// Parse a JSON value that may be either a string or a number into `f64`.
fn parse_f64(val: &Value, field: &str) -> Result<f64, String> {
    let parsed = match val {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("{field}: failed to parse '{s}' as f64"))?,
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("{field}: {n} is not representable as f64"))?,
        other => return Err(format!("{field}: expected string or number, got {other}")),
    };

    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(format!("{field}: value {parsed} is not finite"))
    }
}

fn parse_i64(val: &Value) -> Option<i64> {
    match val {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
