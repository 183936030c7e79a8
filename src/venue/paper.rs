use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Duration;

use super::VenueGateway;
use crate::error::{BotError, Result};
use crate::models::{Candle, Direction, OrderAck};

const MAX_HISTORY: usize = 1000;
const SETTLEMENT_TICKS: usize = 5;

/// Simulated venue for paper trading
///
/// Prices follow a seeded random walk. Every candle fetch closes one new
/// candle, and settlement walks the price a few more ticks and compares the
/// exit against the entry.
pub struct PaperVenue {
    state: Mutex<PaperState>,
    payout_rate: f64,
    settle_delay: Duration,
}

struct PaperState {
    rng: StdRng,
    connected: bool,
    price: f64,
    interval_secs: u64,
    candles: VecDeque<Candle>,
    open_orders: HashMap<String, PaperOrder>,
}

struct PaperOrder {
    amount: f64,
    direction: Direction,
    entry_price: f64,
}

impl PaperVenue {
    /// Create a venue with a fixed seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            state: Mutex::new(PaperState {
                rng: StdRng::seed_from_u64(seed),
                connected: false,
                price: 1.0850,
                interval_secs: 60,
                candles: VecDeque::new(),
                open_orders: HashMap::new(),
            }),
            payout_rate: 85.0,
            settle_delay: Duration::ZERO,
        }
    }

    pub fn with_payout_rate(mut self, payout_rate: f64) -> Self {
        self.payout_rate = payout_rate;
        self
    }

    /// Wall-clock wait before a settlement is reported
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, PaperState>> {
        self.state
            .lock()
            .map_err(|e| BotError::Venue(format!("paper venue state poisoned: {}", e)))
    }
}

impl PaperState {
    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(BotError::ConnectionLost("paper venue is not connected".to_string()))
        }
    }

    /// Advance the random walk by one tick (±0.05% noise)
    fn step_price(&mut self) -> f64 {
        let noise = self.price * self.rng.gen_range(-0.0005..0.0005);
        self.price = (self.price + noise).max(f64::EPSILON);
        self.price
    }

    fn close_candle(&mut self, timestamp: DateTime<Utc>) {
        let open = self.price;
        let close = self.step_price();
        let wick = open.max(close) * self.rng.gen_range(0.0..0.0002);

        self.candles.push_back(Candle {
            timestamp,
            open,
            high: open.max(close) + wick,
            low: open.min(close) - wick,
            close,
            volume: self.rng.gen_range(50.0..500.0),
        });

        while self.candles.len() > MAX_HISTORY {
            self.candles.pop_front();
        }
    }

    /// Regenerate history ending now when fewer than `count` candles exist
    fn backfill(&mut self, count: usize) {
        let count = count.min(MAX_HISTORY);
        if self.candles.len() >= count {
            return;
        }

        self.candles.clear();
        let interval = ChronoDuration::seconds(self.interval_secs as i64);
        let start = Utc::now() - interval * count as i32;
        for i in 0..count {
            self.close_candle(start + interval * i as i32);
        }
    }
}

#[async_trait]
impl VenueGateway for PaperVenue {
    async fn connect(&self) -> Result<bool> {
        self.lock()?.connected = true;
        tracing::info!("📄 Paper venue connected (payout {:.0}%)", self.payout_rate);
        Ok(true)
    }

    async fn fetch_candles(
        &self,
        _instrument: &str,
        interval_secs: u64,
        count: usize,
    ) -> Result<Vec<Candle>> {
        let mut state = self.lock()?;
        state.ensure_connected()?;

        if state.interval_secs != interval_secs {
            state.interval_secs = interval_secs.max(1);
            state.candles.clear();
        }

        state.backfill(count);
        let next_timestamp = state
            .candles
            .back()
            .map(|c| c.timestamp + ChronoDuration::seconds(state.interval_secs as i64))
            .unwrap_or_else(Utc::now);
        state.close_candle(next_timestamp);

        let skip = state.candles.len().saturating_sub(count);
        Ok(state.candles.iter().skip(skip).cloned().collect())
    }

    async fn place_trade(
        &self,
        amount: f64,
        instrument: &str,
        direction: Direction,
        duration_secs: u64,
    ) -> Result<OrderAck> {
        let mut state = self.lock()?;
        state.ensure_connected()?;

        if amount <= 0.0 {
            return Ok(OrderAck {
                accepted: false,
                order_id: String::new(),
            });
        }

        let order_id = uuid::Uuid::new_v4().to_string();
        let entry_price = state.price;
        state.open_orders.insert(
            order_id.clone(),
            PaperOrder {
                amount,
                direction,
                entry_price,
            },
        );

        tracing::debug!(
            "Paper order {} {} {} {:.2} for {}s @ {:.5}",
            order_id,
            instrument,
            direction,
            amount,
            duration_secs,
            entry_price
        );

        Ok(OrderAck {
            accepted: true,
            order_id,
        })
    }

    async fn await_settlement(&self, order_id: &str) -> Result<f64> {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        let mut state = self.lock()?;
        state.ensure_connected()?;

        let order = state
            .open_orders
            .remove(order_id)
            .ok_or_else(|| BotError::Venue(format!("unknown order {}", order_id)))?;

        let mut exit_price = state.price;
        for _ in 0..SETTLEMENT_TICKS {
            exit_price = state.step_price();
        }

        let won = match order.direction {
            Direction::Call => exit_price > order.entry_price,
            Direction::Put => exit_price < order.entry_price,
        };

        let profit = if exit_price == order.entry_price {
            0.0 // Refund on a draw
        } else if won {
            order.amount * self.payout_rate / 100.0
        } else {
            -order.amount
        };

        Ok(profit)
    }

    async fn payout_rate(&self, _instrument: &str) -> Result<f64> {
        self.lock()?.ensure_connected()?;
        Ok(self.payout_rate)
    }

    async fn disconnect(&self) {
        if let Ok(mut state) = self.lock() {
            state.connected = false;
            state.open_orders.clear();
        }
        tracing::info!("📄 Paper venue disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connected_venue() -> PaperVenue {
        let venue = PaperVenue::new(42);
        assert!(venue.connect().await.unwrap());
        venue
    }

    #[tokio::test]
    async fn test_requires_connection() {
        let venue = PaperVenue::new(1);
        let result = venue.fetch_candles("EURUSD", 60, 10).await;
        assert!(matches!(result, Err(BotError::ConnectionLost(_))));
    }

    #[tokio::test]
    async fn test_fetch_returns_ordered_window() {
        let venue = connected_venue().await;

        let candles = venue.fetch_candles("EURUSD", 60, 50).await.unwrap();
        assert_eq!(candles.len(), 50);
        for pair in candles.windows(2) {
            assert_eq!((pair[1].timestamp - pair[0].timestamp).num_seconds(), 60);
            assert_eq!(pair[1].open, pair[0].close);
        }
        assert!(candles.iter().all(|c| c.low <= c.close && c.close <= c.high));
    }

    #[tokio::test]
    async fn test_each_fetch_closes_a_new_candle() {
        let venue = connected_venue().await;

        let first = venue.fetch_candles("EURUSD", 60, 20).await.unwrap();
        let second = venue.fetch_candles("EURUSD", 60, 20).await.unwrap();

        assert_eq!(second[18], first[19]);
        assert!(second[19].timestamp > first[19].timestamp);
    }

    #[tokio::test]
    async fn test_settlement_profit_bounds() {
        let venue = connected_venue().await.with_payout_rate(80.0);

        for _ in 0..20 {
            let ack = venue
                .place_trade(2.0, "EURUSD", Direction::Call, 60)
                .await
                .unwrap();
            assert!(ack.accepted);

            let profit = venue.await_settlement(&ack.order_id).await.unwrap();
            assert!(profit == 1.6 || profit == -2.0 || profit == 0.0);
        }
    }

    #[tokio::test]
    async fn test_unknown_order_fails() {
        let venue = connected_venue().await;
        assert!(venue.await_settlement("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amount() {
        let venue = connected_venue().await;
        let ack = venue
            .place_trade(0.0, "EURUSD", Direction::Put, 60)
            .await
            .unwrap();
        assert!(!ack.accepted);
    }

    #[tokio::test]
    async fn test_disconnect_drops_connection() {
        let venue = connected_venue().await;
        venue.disconnect().await;
        assert!(venue.payout_rate("EURUSD").await.is_err());
    }
}
