use serde::{Deserialize, Serialize};

use super::{ema_series, rsi_series};
use crate::models::Candle;

/// Indicator values at one candle index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub fast_ema: f64,
    pub slow_ema: f64,
    pub rsi: f64,
}

/// Lookback periods for the snapshot indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPeriods {
    pub fast_ema: usize,
    pub slow_ema: usize,
    pub rsi: usize,
}

impl IndicatorPeriods {
    /// Candles needed before the first valid snapshot
    ///
    /// RSI needs one extra close because it works on price changes.
    pub fn min_history(&self) -> usize {
        self.fast_ema.max(self.slow_ema).max(self.rsi + 1)
    }
}

/// Compute one snapshot per candle
///
/// Entries are `None` until every indicator has enough history.
pub fn compute_indicators(
    candles: &[Candle],
    periods: &IndicatorPeriods,
) -> Vec<Option<IndicatorSnapshot>> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let fast = ema_series(&closes, periods.fast_ema);
    let slow = ema_series(&closes, periods.slow_ema);
    let rsi = rsi_series(&closes, periods.rsi);

    fast.into_iter()
        .zip(slow)
        .zip(rsi)
        .map(|((fast_ema, slow_ema), rsi)| {
            Some(IndicatorSnapshot {
                fast_ema: fast_ema?,
                slow_ema: slow_ema?,
                rsi: rsi?,
            })
        })
        .collect()
}
