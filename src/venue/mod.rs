// Brokerage venue abstraction and connection helpers
pub mod paper;

pub use paper::PaperVenue;

use async_trait::async_trait;
use tokio::time::Duration;

use crate::config::ConnectionConfig;
use crate::error::{BotError, Result};
use crate::execution::StopSignal;
use crate::models::{Candle, Direction, OrderAck};

/// Binary-option brokerage as seen by the trade cycle
///
/// Any `Err` returned mid-cycle is treated as a lost connection and ends the
/// session; transient retries belong inside the implementation.
#[async_trait]
pub trait VenueGateway: Send + Sync {
    /// Log in / open the session. `Ok(false)` means the venue refused.
    async fn connect(&self) -> Result<bool>;

    /// Map a requested symbol to the tradable instrument (e.g. an OTC variant
    /// while the regular market is closed)
    async fn resolve_instrument(&self, symbol: &str) -> Result<String> {
        Ok(symbol.to_string())
    }

    /// Most recent `count` candles, oldest first
    async fn fetch_candles(
        &self,
        instrument: &str,
        interval_secs: u64,
        count: usize,
    ) -> Result<Vec<Candle>>;

    async fn place_trade(
        &self,
        amount: f64,
        instrument: &str,
        direction: Direction,
        duration_secs: u64,
    ) -> Result<OrderAck>;

    /// Block until the order settles; returns signed profit
    async fn await_settlement(&self, order_id: &str) -> Result<f64>;

    /// Current payout percentage for the instrument
    async fn payout_rate(&self, instrument: &str) -> Result<f64>;

    async fn disconnect(&self);
}

/// Connect with a bounded number of attempts and a fixed delay between them
///
/// Gives up early if a stop is requested while waiting.
pub async fn connect_with_retry<V: VenueGateway + ?Sized>(
    venue: &V,
    config: &ConnectionConfig,
    stop: &StopSignal,
) -> Result<()> {
    let max_attempts = config.max_attempts.max(1);
    let delay = Duration::from_secs(config.retry_delay_secs);

    for attempt in 1..=max_attempts {
        match venue.connect().await {
            Ok(true) => {
                if attempt > 1 {
                    tracing::info!("✓ Connected after {} attempts", attempt);
                }
                return Ok(());
            }
            Ok(false) => {
                tracing::warn!("⚠️ Attempt ▶ {}/{} refused by venue", attempt, max_attempts);
            }
            Err(e) => {
                tracing::warn!("⚠️ Attempt ▶ {}/{} failed: {}", attempt, max_attempts, e);
            }
        }

        if attempt < max_attempts && !stop.sleep(delay).await {
            return Err(BotError::ConnectionLost(
                "stop requested while connecting".to_string(),
            ));
        }
    }

    Err(BotError::ConnectionLost(format!(
        "gave up after {} attempts",
        max_attempts
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Refuses the first `failures` connects, then succeeds
    struct FlakyVenue {
        failures: u32,
        attempts: AtomicU32,
    }

    impl FlakyVenue {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                attempts: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl VenueGateway for FlakyVenue {
        async fn connect(&self) -> Result<bool> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt <= self.failures {
                if attempt % 2 == 0 {
                    return Err(BotError::Venue("handshake timeout".to_string()));
                }
                return Ok(false);
            }
            Ok(true)
        }

        async fn fetch_candles(&self, _: &str, _: u64, _: usize) -> Result<Vec<Candle>> {
            Ok(Vec::new())
        }

        async fn place_trade(&self, _: f64, _: &str, _: Direction, _: u64) -> Result<OrderAck> {
            Err(BotError::Venue("not supported".to_string()))
        }

        async fn await_settlement(&self, _: &str) -> Result<f64> {
            Ok(0.0)
        }

        async fn payout_rate(&self, _: &str) -> Result<f64> {
            Ok(0.0)
        }

        async fn disconnect(&self) {}
    }

    fn policy(max_attempts: u32) -> ConnectionConfig {
        ConnectionConfig {
            max_attempts,
            retry_delay_secs: 0,
        }
    }

    #[tokio::test]
    async fn test_connects_after_failures() {
        let venue = FlakyVenue::new(3);
        let result = connect_with_retry(&venue, &policy(5), &StopSignal::new()).await;

        assert!(result.is_ok());
        assert_eq!(venue.attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let venue = FlakyVenue::new(10);
        let result = connect_with_retry(&venue, &policy(3), &StopSignal::new()).await;

        assert!(matches!(result, Err(BotError::ConnectionLost(_))));
        assert_eq!(venue.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stop_aborts_retry_loop() {
        let venue = FlakyVenue::new(10);
        let stop = StopSignal::new();
        stop.request();

        let result = connect_with_retry(&venue, &policy(100), &stop).await;

        assert!(result.is_err());
        assert_eq!(venue.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_default_instrument_resolution() {
        let venue = FlakyVenue::new(0);
        assert_eq!(venue.resolve_instrument("EURUSD").await.unwrap(), "EURUSD");
    }
}
