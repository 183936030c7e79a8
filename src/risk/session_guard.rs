use serde::{Deserialize, Serialize};

/// Daily profit/loss limits that end a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionLimits {
    pub profit_target: f64,
    /// Positive amount; the session stops once cumulative profit reaches `-loss_limit`
    pub loss_limit: f64,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            profit_target: 50.0, // +50 USD
            loss_limit: 50.0,    // -50 USD
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionLedger {
    pub cumulative_profit: f64,
    pub profit_target: f64,
    pub loss_limit: f64,
    pub trades: u32,
    pub wins: u32,
    pub losses: u32,
}

impl SessionLedger {
    pub fn new(limits: &SessionLimits) -> Self {
        Self {
            cumulative_profit: 0.0,
            profit_target: limits.profit_target,
            loss_limit: limits.loss_limit,
            trades: 0,
            wins: 0,
            losses: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    Continue,
    StopProfitTarget,
    StopLossLimit,
}

impl GuardVerdict {
    pub fn is_stop(&self) -> bool {
        !matches!(self, GuardVerdict::Continue)
    }
}

/// Tracks session profit and decides when trading must stop
#[derive(Debug, Clone)]
pub struct RiskGuard {
    ledger: SessionLedger,
}

impl RiskGuard {
    pub fn new(limits: &SessionLimits) -> Self {
        Self {
            ledger: SessionLedger::new(limits),
        }
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    /// Fold a settled trade's signed profit into the ledger
    pub fn record_outcome(&mut self, profit_delta: f64) -> GuardVerdict {
        self.ledger.cumulative_profit += profit_delta;
        self.ledger.trades += 1;
        if profit_delta > 0.0 {
            self.ledger.wins += 1;
        } else {
            self.ledger.losses += 1;
        }

        self.check()
    }

    /// Evaluate the ledger without mutating it
    ///
    /// Profit target is checked first: a net-positive session is never
    /// reported as a stop-loss.
    pub fn check(&self) -> GuardVerdict {
        let profit = self.ledger.cumulative_profit;

        if profit >= self.ledger.profit_target {
            return GuardVerdict::StopProfitTarget;
        }

        if profit <= -self.ledger.loss_limit {
            return GuardVerdict::StopLossLimit;
        }

        GuardVerdict::Continue
    }
}
