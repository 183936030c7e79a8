// Technical indicators module
// Implements EMA, RSI and per-candle indicator snapshots

pub mod moving_average;
pub mod rsi;
pub mod snapshot;

pub use moving_average::{calculate_ema, calculate_sma, ema_series};
pub use rsi::{calculate_rsi, rsi_series};
pub use snapshot::{compute_indicators, IndicatorPeriods, IndicatorSnapshot};
