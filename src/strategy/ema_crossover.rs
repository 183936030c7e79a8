use super::{
    signals::{generate_signal, SignalConfig},
    Strategy,
};
use crate::indicators::{compute_indicators, IndicatorSnapshot};
use crate::models::{Candle, Signal};

/// Short-horizon trend strategy for binary options
///
/// Fast/slow EMA crossover on closes, confirmed by RSI. Only the two most
/// recent snapshots are consulted, so a signal fires on the candle where the
/// crossover happens and not after.
#[derive(Debug, Clone)]
pub struct EmaCrossoverStrategy {
    config: SignalConfig,
}

impl EmaCrossoverStrategy {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Last two valid snapshots, oldest first
    pub fn latest_snapshots(
        &self,
        candles: &[Candle],
    ) -> Option<(IndicatorSnapshot, IndicatorSnapshot)> {
        let snapshots = compute_indicators(candles, &self.config.periods());
        match snapshots.as_slice() {
            [.., Some(prev), Some(curr)] => Some((*prev, *curr)),
            _ => None,
        }
    }
}

impl Default for EmaCrossoverStrategy {
    fn default() -> Self {
        Self::new(SignalConfig::default())
    }
}

impl Strategy for EmaCrossoverStrategy {
    fn generate_signal(&self, candles: &[Candle]) -> Signal {
        if candles.len() < self.min_candles_required() {
            tracing::debug!(
                "Insufficient data: {} candles, need {}",
                candles.len(),
                self.min_candles_required()
            );
            return Signal::Hold;
        }

        match self.latest_snapshots(candles) {
            Some((prev, curr)) => {
                tracing::debug!(
                    "Indicators: fast EMA={:.5}, slow EMA={:.5}, RSI={:.1}",
                    curr.fast_ema,
                    curr.slow_ema,
                    curr.rsi
                );
                generate_signal(&prev, &curr, &self.config)
            }
            None => Signal::Hold,
        }
    }

    fn name(&self) -> &str {
        "EmaCrossoverStrategy"
    }

    fn min_candles_required(&self) -> usize {
        // Two consecutive valid snapshots
        self.config.periods().min_history() + 1
    }
}
