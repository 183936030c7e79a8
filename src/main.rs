use std::path::PathBuf;

use clap::Parser;
use optionbot::config::{BotConfig, TelegramCredentials};
use optionbot::execution::{StopSignal, TradingSession};
use optionbot::notify::{LogNotifier, Notifier, TelegramNotifier};
use optionbot::venue::PaperVenue;

#[derive(Parser)]
#[command(name = "optionbot")]
#[command(about = "EMA/RSI binary-option bot with martingale staking", long_about = None)]
struct Cli {
    /// Config file (defaults to config/config.dev.json, or config.prod.json when IS_SERVER=true)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured instrument
    #[arg(short, long)]
    instrument: Option<String>,

    /// Seed for the paper venue's price walk
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Payout percentage offered by the paper venue
    #[arg(long, default_value_t = 85.0)]
    paper_payout: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();

    let mut config = BotConfig::load(cli.config.as_deref())?;
    if let Some(instrument) = cli.instrument {
        config.trading.instrument = instrument;
        config.validate()?;
    }

    tracing::info!(
        "🚀 OptionBot starting on {} (base stake {:.2} x{} up to {} steps)",
        config.trading.instrument,
        config.martingale.base_stake,
        config.martingale.multiplier,
        config.martingale.max_steps
    );

    let venue = PaperVenue::new(cli.seed).with_payout_rate(cli.paper_payout);

    let notifier: Box<dyn Notifier> = match TelegramCredentials::from_env() {
        Some(credentials) => {
            tracing::info!("Telegram notifications enabled");
            Box::new(TelegramNotifier::from_credentials(&credentials))
        }
        None => {
            tracing::warn!("Telegram credentials not set, status messages go to the log only");
            Box::new(LogNotifier::new())
        }
    };

    let stop = StopSignal::new();
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("⚠️  Received Ctrl+C, stopping after the current cycle...");
                stop.request();
            }
        });
    }

    let mut session = TradingSession::new(venue, notifier, &config, stop);
    session.connect().await?;

    let reason = session.run().await;
    let ledger = session.ledger();
    tracing::info!(
        "👋 OptionBot stopped: {} ({} trades, {:.2} USD)",
        reason,
        ledger.trades,
        ledger.cumulative_profit
    );

    Ok(())
}

fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("optionbot=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
