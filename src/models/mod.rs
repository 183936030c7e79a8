use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV candlestick for one sampling interval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Trading signal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    /// No actionable crossover this cycle
    Hold,
}

impl Signal {
    /// Option direction for an actionable signal
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Signal::Buy => Some(Direction::Call),
            Signal::Sell => Some(Direction::Put),
            Signal::Hold => None,
        }
    }
}

/// Binary option direction as the venue understands it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Call,
    Put,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Call => "call",
            Direction::Put => "put",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Direction::Call => "🟩",
            Direction::Put => "🟥",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Venue acknowledgement for a placed order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderAck {
    pub accepted: bool,
    pub order_id: String,
}

/// A trade in flight, discarded once settled
#[derive(Debug, Clone)]
pub struct TradeRecord {
    pub order_id: String,
    pub instrument: String,
    pub direction: Direction,
    pub stake: f64,
    pub payout_rate: f64,
    pub martingale_step: u32,
    pub opened_at: DateTime<Utc>,
}

/// Settled result of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOutcome {
    Win,
    Loss,
}

impl TradeOutcome {
    /// Anything that did not return a profit (including a refunded draw) counts as a loss
    pub fn from_profit(profit: f64) -> Self {
        if profit > 0.0 {
            TradeOutcome::Win
        } else {
            TradeOutcome::Loss
        }
    }
}
