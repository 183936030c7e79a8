use thiserror::Error;

/// Errors surfaced by the venue, notifier and configuration layers
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Venue error: {0}")]
    Venue(String),

    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
