use serde::{Deserialize, Serialize};

use crate::models::TradeOutcome;

/// Martingale staking parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MartingaleConfig {
    pub base_stake: f64,
    pub multiplier: f64,
    pub max_steps: u32,
}

impl Default for MartingaleConfig {
    fn default() -> Self {
        Self {
            base_stake: 1.0,
            multiplier: 2.5,
            max_steps: 5,
        }
    }
}

/// Current position in the martingale ladder
///
/// `current_stake == base_stake * multiplier^martingale_step` at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct StakeState {
    pub base_stake: f64,
    pub current_stake: f64,
    pub martingale_step: u32,
    pub max_steps: u32,
    pub multiplier: f64,
}

/// What a settled trade did to the stake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeUpdate {
    /// Win: back to base stake
    Reset,
    /// Loss: stake multiplied, step advanced
    Advanced,
    /// Loss at the step cap: the ladder is exhausted, session must stop
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct StakeController {
    state: StakeState,
}

impl StakeController {
    pub fn new(config: &MartingaleConfig) -> Self {
        Self {
            state: StakeState {
                base_stake: config.base_stake,
                current_stake: config.base_stake,
                martingale_step: 0,
                max_steps: config.max_steps,
                multiplier: config.multiplier,
            },
        }
    }

    pub fn state(&self) -> &StakeState {
        &self.state
    }

    pub fn current_stake(&self) -> f64 {
        self.state.current_stake
    }

    pub fn step(&self) -> u32 {
        self.state.martingale_step
    }

    /// Advance or reset the ladder for a settled trade
    pub fn record_outcome(&mut self, outcome: TradeOutcome) -> StakeUpdate {
        match outcome {
            TradeOutcome::Win => {
                self.reset();
                StakeUpdate::Reset
            }
            TradeOutcome::Loss if self.state.martingale_step < self.state.max_steps => {
                self.state.martingale_step += 1;
                self.state.current_stake *= self.state.multiplier;
                tracing::debug!(
                    "Martingale step {}/{} -> stake {:.2}",
                    self.state.martingale_step,
                    self.state.max_steps,
                    self.state.current_stake
                );
                StakeUpdate::Advanced
            }
            TradeOutcome::Loss => {
                tracing::warn!(
                    "⚠️ Martingale exhausted at step {}/{}",
                    self.state.martingale_step,
                    self.state.max_steps
                );
                StakeUpdate::Exhausted
            }
        }
    }

    pub fn reset(&mut self) {
        self.state.martingale_step = 0;
        self.state.current_stake = self.state.base_stake;
    }
}
