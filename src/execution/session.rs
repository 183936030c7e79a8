use chrono::{Timelike, Utc};
use tokio::time::Duration;

use super::StopSignal;
use crate::config::{BotConfig, ConnectionConfig, TradingConfig};
use crate::error::Result;
use crate::models::{TradeOutcome, TradeRecord};
use crate::notify::{MessageHandle, Notifier};
use crate::risk::{
    GuardVerdict, RiskGuard, SessionLedger, StakeController, StakeState, StakeUpdate,
};
use crate::strategy::{EmaCrossoverStrategy, Strategy};
use crate::venue::{self, VenueGateway};

/// Why a session ended
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    ProfitTarget,
    LossLimit,
    MartingaleExhausted,
    VenueFailure(String),
    Cancelled,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::ProfitTarget => write!(f, "🎉 Profit target reached"),
            StopReason::LossLimit => write!(f, "🚨 Stop loss limit reached"),
            StopReason::MartingaleExhausted => write!(f, "⚠️ Maximum Martingale steps reached"),
            StopReason::VenueFailure(e) => write!(f, "⚠️ Connection is closed: {}", e),
            StopReason::Cancelled => write!(f, "⚠️ BOT STOPPED by user"),
        }
    }
}

/// Result of one polling cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    OutsideTradingWindow,
    InsufficientHistory { have: usize, need: usize },
    NoSignal,
    /// Payout below threshold; caller should cool down before the next cycle
    PayoutTooLow { rate: f64 },
    /// Venue declined the order; nothing changed
    Rejected,
    Settled {
        profit: f64,
        outcome: TradeOutcome,
        verdict: GuardVerdict,
    },
    Terminal(StopReason),
}

/// One trading session against a single venue and instrument
///
/// Owns the stake ladder and the session ledger. Once a stop reason is
/// recorded the session is terminal and makes no further venue calls.
pub struct TradingSession<V: VenueGateway, N: Notifier> {
    venue: V,
    notifier: N,
    strategy: Box<dyn Strategy>,
    trading: TradingConfig,
    connection: ConnectionConfig,
    stake: StakeController,
    guard: RiskGuard,
    stop: StopSignal,
    stop_reason: Option<StopReason>,
}

impl<V: VenueGateway, N: Notifier> TradingSession<V, N> {
    pub fn new(venue: V, notifier: N, config: &BotConfig, stop: StopSignal) -> Self {
        Self {
            venue,
            notifier,
            strategy: Box::new(EmaCrossoverStrategy::new(config.signal.clone())),
            trading: config.trading.clone(),
            connection: config.connection.clone(),
            stake: StakeController::new(&config.martingale),
            guard: RiskGuard::new(&config.session),
            stop,
            stop_reason: None,
        }
    }

    pub fn with_strategy(mut self, strategy: Box<dyn Strategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn stake_state(&self) -> &StakeState {
        self.stake.state()
    }

    pub fn ledger(&self) -> &SessionLedger {
        self.guard.ledger()
    }

    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop_reason.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.stop_reason.is_some()
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    pub fn venue(&self) -> &V {
        &self.venue
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Connect to the venue with the configured retry policy
    ///
    /// A stop requested while retrying ends the session as `Cancelled` and is
    /// not an error; `run` then returns immediately.
    pub async fn connect(&mut self) -> Result<()> {
        match venue::connect_with_retry(&self.venue, &self.connection, &self.stop).await {
            Ok(()) => {
                tracing::info!(
                    "Strategy {} on {} (stake {:.2}, max steps {})",
                    self.strategy.name(),
                    self.trading.instrument,
                    self.stake.current_stake(),
                    self.stake.state().max_steps
                );
                self.announce("🤖 BOT STARTED").await;
                Ok(())
            }
            Err(_) if self.stop.is_requested() => {
                self.finish(StopReason::Cancelled).await;
                Ok(())
            }
            Err(e) => {
                self.announce("❌ Failed to connect").await;
                self.stop_reason = Some(StopReason::VenueFailure(e.to_string()));
                Err(e)
            }
        }
    }

    /// Loop cycles until the session terminates
    pub async fn run(&mut self) -> StopReason {
        loop {
            let pause_secs = match self.run_cycle().await {
                CycleOutcome::Terminal(reason) => return reason,
                CycleOutcome::PayoutTooLow { .. } => self.trading.payout_cooldown_secs,
                _ => self.trading.poll_interval_secs,
            };

            // A stop during the pause is picked up at the top of the next cycle
            self.stop.sleep(Duration::from_secs(pause_secs)).await;
        }
    }

    /// Run a single polling cycle
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        if let Some(reason) = &self.stop_reason {
            return CycleOutcome::Terminal(reason.clone());
        }

        if self.stop.is_requested() {
            return self.finish(StopReason::Cancelled).await;
        }

        if let Some(window) = self.trading.trading_window {
            if !window.allows(Utc::now().minute()) {
                return CycleOutcome::OutsideTradingWindow;
            }
        }

        match self.trade_cycle().await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("❌ Venue error: {}", e);
                self.finish(StopReason::VenueFailure(e.to_string())).await
            }
        }
    }

    async fn trade_cycle(&mut self) -> Result<CycleOutcome> {
        let instrument = self.venue.resolve_instrument(&self.trading.instrument).await?;

        let need = self.strategy.min_candles_required();
        let count = self.trading.candle_count.max(need);
        let candles = self
            .venue
            .fetch_candles(&instrument, self.trading.candle_interval_secs, count)
            .await?;

        if candles.len() < need {
            tracing::debug!("Waiting for history: {}/{} candles", candles.len(), need);
            return Ok(CycleOutcome::InsufficientHistory {
                have: candles.len(),
                need,
            });
        }

        let signal = self.strategy.generate_signal(&candles);
        let direction = match signal.direction() {
            Some(direction) => direction,
            None => return Ok(CycleOutcome::NoSignal),
        };

        let rate = self.venue.payout_rate(&instrument).await?;
        if rate < self.trading.payout_threshold {
            self.announce(&format!(
                "⚠️ Payout `[{}/{}]`%",
                rate, self.trading.payout_threshold
            ))
            .await;
            return Ok(CycleOutcome::PayoutTooLow { rate });
        }

        let stake = self.stake.current_stake();
        let ack = self
            .venue
            .place_trade(stake, &instrument, direction, self.trading.trade_duration_secs)
            .await?;

        if !ack.accepted {
            tracing::warn!("⚠️ {} {} {:.2} rejected by venue", instrument, direction, stake);
            self.announce(&format!("⛔ Order rejected: {} {:.2}", direction.emoji(), stake))
                .await;
            return Ok(CycleOutcome::Rejected);
        }

        let record = TradeRecord {
            order_id: ack.order_id,
            instrument,
            direction,
            stake,
            payout_rate: rate,
            martingale_step: self.stake.step(),
            opened_at: Utc::now(),
        };

        tracing::info!(
            order_id = %record.order_id,
            instrument = %record.instrument,
            direction = %record.direction,
            stake = record.stake,
            payout = record.payout_rate,
            step = record.martingale_step,
            "📈 Trade placed on {:?} signal",
            signal
        );

        let handle = self
            .announce(&format!(
                "{} {:.2} `[{}/{}]`",
                record.direction.emoji(),
                record.stake,
                record.martingale_step,
                self.stake.state().max_steps
            ))
            .await;

        let profit = self.venue.await_settlement(&record.order_id).await?;
        Ok(self.settle(record, profit, handle).await)
    }

    /// Fold a settled trade into the stake ladder and the ledger
    async fn settle(
        &mut self,
        record: TradeRecord,
        profit: f64,
        handle: Option<MessageHandle>,
    ) -> CycleOutcome {
        let outcome = TradeOutcome::from_profit(profit);
        let update = self.stake.record_outcome(outcome);
        let verdict = self.guard.record_outcome(profit);
        let total = self.guard.ledger().cumulative_profit;

        tracing::info!(
            order_id = %record.order_id,
            held_secs = (Utc::now() - record.opened_at).num_seconds(),
            "{} {:?} {:+.2} (total {:.2})",
            if outcome == TradeOutcome::Win { "✓" } else { "✗" },
            outcome,
            profit,
            total
        );

        let text = format!(
            "{} {:.2} `[{}/{}]` 💰 {:.2} USD",
            if outcome == TradeOutcome::Win { "🟢" } else { "🔴" },
            profit,
            record.martingale_step,
            self.stake.state().max_steps,
            total
        );
        self.amend(handle, &text).await;

        let reason = match (update, verdict) {
            (StakeUpdate::Exhausted, _) => Some(StopReason::MartingaleExhausted),
            (_, GuardVerdict::StopProfitTarget) => Some(StopReason::ProfitTarget),
            (_, GuardVerdict::StopLossLimit) => Some(StopReason::LossLimit),
            _ => None,
        };

        match reason {
            Some(reason) => self.finish(reason).await,
            None => CycleOutcome::Settled {
                profit,
                outcome,
                verdict,
            },
        }
    }

    /// Enter the terminal state: disconnect and post the final status once
    async fn finish(&mut self, reason: StopReason) -> CycleOutcome {
        if let Some(existing) = &self.stop_reason {
            return CycleOutcome::Terminal(existing.clone());
        }
        self.stop_reason = Some(reason.clone());

        self.venue.disconnect().await;

        let ledger = self.guard.ledger();
        let text = format!(
            "{}\n💰 {:.2} USD | {} trades ({}W/{}L)",
            reason, ledger.cumulative_profit, ledger.trades, ledger.wins, ledger.losses
        );
        self.announce(&text).await;
        tracing::info!("🛑 BOT is shutting down...");

        CycleOutcome::Terminal(reason)
    }

    /// Post a status message; delivery failures are logged and swallowed
    async fn announce(&self, text: &str) -> Option<MessageHandle> {
        tracing::info!("{}", text.replace('`', ""));
        match self.notifier.post_status(text).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("⚠️ Failed to post status: {}", e);
                None
            }
        }
    }

    /// Edit the message behind `handle`, or post a fresh one without it
    async fn amend(&self, handle: Option<MessageHandle>, text: &str) {
        match handle {
            Some(handle) => {
                tracing::info!("{}", text.replace('`', ""));
                if let Err(e) = self.notifier.update_status(&handle, text).await {
                    tracing::warn!("⚠️ Failed to update status: {}", e);
                }
            }
            None => {
                self.announce(text).await;
            }
        }
    }
}
