// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators shown on a quote.
// Every public function returns `Option<T>`: `None` means the series is too
// short for the requested period, never a failure of the caller.

pub mod ema;
pub mod rsi;

pub use ema::{compute_ema, EMA_FAST, EMA_MID, EMA_SLOW};
pub use rsi::{compute_rsi, RSI_PERIOD};
