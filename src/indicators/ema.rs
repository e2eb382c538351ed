// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The seed is the SMA of the *oldest* `period` closes; the recurrence then
// folds over every remaining close in chronological order.
// =============================================================================

/// Fast EMA look-back.
pub const EMA_FAST: usize = 9;
/// Medium EMA look-back.
pub const EMA_MID: usize = 21;
/// Slow EMA look-back.
pub const EMA_SLOW: usize = 50;

/// Compute the EMA value at the most recent close.
///
/// Each call recomputes from scratch over the full series.
///
/// # Edge cases
/// - `period == 0` => `None`
/// - `closes.len() < period` => `None`
/// - `closes.len() == period` => the plain mean, no recurrence steps
pub fn compute_ema(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let multiplier = 2.0 / (period + 1) as f64;
    let seed = closes[..period].iter().sum::<f64>() / period as f64;

    let ema = closes[period..]
        .iter()
        .fold(seed, |prev, &close| close * multiplier + prev * (1.0 - multiplier));

    Some(ema)
}
