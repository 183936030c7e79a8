use serde::{Deserialize, Serialize};

use crate::indicators::{IndicatorPeriods, IndicatorSnapshot};
use crate::models::Signal;

/// Configuration for signal generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalConfig {
    pub fast_ema_period: usize,
    pub slow_ema_period: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            fast_ema_period: 5,
            slow_ema_period: 12,
            rsi_period: 9,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

impl SignalConfig {
    pub fn periods(&self) -> IndicatorPeriods {
        IndicatorPeriods {
            fast_ema: self.fast_ema_period,
            slow_ema: self.slow_ema_period,
            rsi: self.rsi_period,
        }
    }
}

/// EMA crossover with RSI confirmation
///
/// - Buy: fast EMA crosses above slow EMA and RSI is above oversold
/// - Sell: fast EMA crosses below slow EMA and RSI is below overbought
/// - Hold: anything else
///
/// The two crossovers are mutually exclusive, so no tie-break is needed.
pub fn generate_signal(
    prev: &IndicatorSnapshot,
    curr: &IndicatorSnapshot,
    config: &SignalConfig,
) -> Signal {
    let crossed_up = prev.fast_ema < prev.slow_ema && curr.fast_ema > curr.slow_ema;
    let crossed_down = prev.fast_ema > prev.slow_ema && curr.fast_ema < curr.slow_ema;

    if crossed_up && curr.rsi > config.rsi_oversold {
        tracing::debug!(
            "BUY: fast EMA {:.5} crossed above slow EMA {:.5}, RSI={:.1}",
            curr.fast_ema,
            curr.slow_ema,
            curr.rsi
        );
        Signal::Buy
    } else if crossed_down && curr.rsi < config.rsi_overbought {
        tracing::debug!(
            "SELL: fast EMA {:.5} crossed below slow EMA {:.5}, RSI={:.1}",
            curr.fast_ema,
            curr.slow_ema,
            curr.rsi
        );
        Signal::Sell
    } else {
        tracing::trace!(
            "HOLD: up={} down={} RSI={:.1}",
            crossed_up,
            crossed_down,
            curr.rsi
        );
        Signal::Hold
    }
}
