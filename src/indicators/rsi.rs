// =============================================================================
// Relative Strength Index (RSI) — Trailing-Window Average
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Take the last `period` one-step changes ending at the latest close.
// Step 2 — Sum positive changes into `gains`, magnitudes of negative changes
//          into `losses`.
// Step 3 — avg_gain = gains / period,  avg_loss = losses / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// NOTE: this is a single simple average over a fixed trailing window, not
// Wilder's smoothing. Values will not match incrementally-updated RSI feeds.
// =============================================================================

/// Standard RSI look-back.
pub const RSI_PERIOD: usize = 14;

/// Compute the RSI of the most recent `period` transitions in `closes`.
///
/// # Edge cases
/// - `period == 0` => `None`
/// - `closes.len() < period + 1` => `None` (need `period` deltas)
/// - Average loss of zero (including a flat window) => exactly `100.0`
pub fn compute_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let window = &closes[closes.len() - period - 1..];
    let (gains, losses) = window.windows(2).fold((0.0_f64, 0.0_f64), |(g, l), w| {
        let change = w[1] - w[0];
        if change > 0.0 {
            (g + change, l)
        } else {
            (g, l - change)
        }
    });

    let period_f = period as f64;
    let avg_gain = gains / period_f;
    let avg_loss = losses / period_f;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}
