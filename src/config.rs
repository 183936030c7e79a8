//! Bot configuration
//!
//! Loaded once at startup from an optional JSON file plus `OPTIONBOT_*`
//! environment overrides, then passed by reference into each component.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};
use crate::risk::{MartingaleConfig, SessionLimits};
use crate::strategy::SignalConfig;

const ENV_PREFIX: &str = "OPTIONBOT";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BotConfig {
    pub trading: TradingConfig,
    pub martingale: MartingaleConfig,
    pub session: SessionLimits,
    pub signal: SignalConfig,
    pub connection: ConnectionConfig,
}

/// Instrument, timing and payout settings for the trade cycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TradingConfig {
    pub instrument: String,
    pub candle_interval_secs: u64,
    pub candle_count: usize,
    pub trade_duration_secs: u64,
    pub poll_interval_secs: u64,
    /// Minimum payout percentage worth trading at
    pub payout_threshold: f64,
    pub payout_cooldown_secs: u64,
    pub trading_window: Option<TradingWindow>,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            instrument: "EURUSD".to_string(),
            candle_interval_secs: 60,
            candle_count: 100,
            trade_duration_secs: 60,
            poll_interval_secs: 1,
            payout_threshold: 70.0,
            payout_cooldown_secs: 300,
            trading_window: None,
        }
    }
}

/// Minutes of the hour in which new trades may open (both bounds exclusive)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradingWindow {
    pub start_minute: u32,
    pub end_minute: u32,
}

impl TradingWindow {
    pub fn allows(&self, minute: u32) -> bool {
        self.start_minute < minute && minute < self.end_minute
    }
}

/// Venue connect retry policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectionConfig {
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1000,
            retry_delay_secs: 5,
        }
    }
}

impl BotConfig {
    /// Load from `path` (or the environment-selected default file) plus env overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
        Self::build(&path, environment())
    }

    fn build(path: &Path, env: config::Environment) -> Result<Self> {
        if path.exists() {
            tracing::info!("Loading configuration from {}", path.display());
        } else {
            tracing::warn!("Config file {} not found, using defaults", path.display());
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(env)
            .build()?;

        let config: BotConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.martingale;
        if m.base_stake <= 0.0 {
            return invalid(format!("base_stake must be positive, got {}", m.base_stake));
        }
        if m.multiplier < 1.0 {
            return invalid(format!("multiplier must be >= 1, got {}", m.multiplier));
        }

        let s = &self.session;
        if s.profit_target <= 0.0 || s.loss_limit <= 0.0 {
            return invalid(format!(
                "profit_target and loss_limit must be positive, got {} / {}",
                s.profit_target, s.loss_limit
            ));
        }

        let sig = &self.signal;
        if sig.fast_ema_period == 0 || sig.slow_ema_period == 0 || sig.rsi_period == 0 {
            return invalid("indicator periods must be non-zero".to_string());
        }
        if sig.fast_ema_period >= sig.slow_ema_period {
            return invalid(format!(
                "fast_ema_period ({}) must be shorter than slow_ema_period ({})",
                sig.fast_ema_period, sig.slow_ema_period
            ));
        }
        if sig.rsi_oversold >= sig.rsi_overbought {
            return invalid(format!(
                "rsi_oversold ({}) must be below rsi_overbought ({})",
                sig.rsi_oversold, sig.rsi_overbought
            ));
        }

        let t = &self.trading;
        if t.instrument.trim().is_empty() {
            return invalid("instrument must not be empty".to_string());
        }
        if !(0.0..=100.0).contains(&t.payout_threshold) {
            return invalid(format!(
                "payout_threshold must be a percentage, got {}",
                t.payout_threshold
            ));
        }
        if let Some(window) = t.trading_window {
            if window.start_minute >= window.end_minute || window.end_minute > 60 {
                return invalid(format!("invalid trading window {:?}", window));
            }
        }

        Ok(())
    }
}

fn invalid(msg: String) -> Result<()> {
    Err(BotError::InvalidConfig(msg))
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Running on the server host (`IS_SERVER=true`)
pub fn is_server() -> bool {
    std::env::var("IS_SERVER").map(|v| v == "true").unwrap_or(false)
}

fn default_config_path() -> PathBuf {
    if is_server() {
        PathBuf::from("config/config.prod.json")
    } else {
        PathBuf::from("config/config.dev.json")
    }
}

/// Telegram bot credentials from the environment
#[derive(Debug, Clone)]
pub struct TelegramCredentials {
    pub token: String,
    pub chat_id: String,
}

impl TelegramCredentials {
    /// `TELEGRAM_PROD_TOKEN` on the server, `TELEGRAM_DEV_TOKEN` elsewhere, plus `TELEGRAM_CHAT_ID`
    pub fn from_env() -> Option<Self> {
        let token_var = if is_server() {
            "TELEGRAM_PROD_TOKEN"
        } else {
            "TELEGRAM_DEV_TOKEN"
        };

        let token = std::env::var(token_var).ok().filter(|t| !t.is_empty())?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok().filter(|c| !c.is_empty())?;
        Some(Self { token, chat_id })
    }
}
