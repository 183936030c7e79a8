// Trading strategy module
pub mod ema_crossover;
pub mod signals;

pub use ema_crossover::EmaCrossoverStrategy;
pub use signals::{generate_signal, SignalConfig};

use crate::models::{Candle, Signal};

/// Base trait for all trading strategies
pub trait Strategy: Send + Sync {
    /// Generate a trading signal from the candle window (oldest first).
    /// Returns `Signal::Hold` when the window is too short.
    fn generate_signal(&self, candles: &[Candle]) -> Signal;

    /// Get strategy name
    fn name(&self) -> &str;

    /// Minimum candles required for this strategy
    fn min_candles_required(&self) -> usize;
}
