// Operator status channel
pub mod telegram;

pub use telegram::TelegramNotifier;

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use crate::error::Result;

/// Identifies a posted status message so it can be edited later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle(pub i64);

/// Where human-readable session updates go
///
/// Callers treat every failure here as non-fatal.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post_status(&self, text: &str) -> Result<MessageHandle>;

    async fn update_status(&self, handle: &MessageHandle, text: &str) -> Result<()>;
}

/// Notifier that only writes to the log, used when no chat is configured
#[derive(Debug, Default)]
pub struct LogNotifier {
    next_id: AtomicI64,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn post_status(&self, text: &str) -> Result<MessageHandle> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(message_id = id, "status: {}", text);
        Ok(MessageHandle(id))
    }

    async fn update_status(&self, handle: &MessageHandle, text: &str) -> Result<()> {
        tracing::debug!(message_id = handle.0, "status edit: {}", text);
        Ok(())
    }
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Box<T> {
    async fn post_status(&self, text: &str) -> Result<MessageHandle> {
        (**self).post_status(text).await
    }

    async fn update_status(&self, handle: &MessageHandle, text: &str) -> Result<()> {
        (**self).update_status(handle, text).await
    }
}
