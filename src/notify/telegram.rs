use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{MessageHandle, Notifier};
use crate::config::TelegramCredentials;
use crate::error::{BotError, Result};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

type TelegramRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Bot API client posting status messages to a single chat
///
/// Cloneable; all clones share the same rate limiter.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    base_url: String,
    token: String,
    chat_id: String,
    rate_limiter: Arc<TelegramRateLimiter>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        // Telegram allows roughly one message per second per chat
        let quota = Quota::per_second(NonZeroU32::MIN);

        Self {
            client: Client::new(),
            base_url: TELEGRAM_API_BASE.to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    pub fn from_credentials(credentials: &TelegramCredentials) -> Self {
        Self::new(credentials.token.clone(), credentials.chat_id.clone())
    }

    /// Point at a different API host (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> Result<ApiResponse> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BotError::Notify(format!(
                "{} returned HTTP {}: {}",
                method, status, text
            )));
        }

        let parsed: ApiResponse = response.json().await?;
        if !parsed.ok {
            return Err(BotError::Notify(format!(
                "{} failed: {}",
                method,
                parsed.description.as_deref().unwrap_or("unknown error")
            )));
        }

        Ok(parsed)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn post_status(&self, text: &str) -> Result<MessageHandle> {
        let response = self
            .call(
                "sendMessage",
                json!({
                    "chat_id": self.chat_id,
                    "text": text,
                    "parse_mode": "Markdown",
                }),
            )
            .await?;

        response
            .result
            .as_ref()
            .and_then(|r| r.get("message_id"))
            .and_then(|id| id.as_i64())
            .map(MessageHandle)
            .ok_or_else(|| BotError::Notify("sendMessage response without message_id".to_string()))
    }

    async fn update_status(&self, handle: &MessageHandle, text: &str) -> Result<()> {
        self.call(
            "editMessageText",
            json!({
                "chat_id": self.chat_id,
                "message_id": handle.0,
                "text": text,
                "parse_mode": "Markdown",
            }),
        )
        .await?;
        Ok(())
    }
}
