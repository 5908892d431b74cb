//! Trait definitions for the notify module.

use async_trait::async_trait;

use super::error::NotifyError;
use super::types::NotificationMessage;

/// A push notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name, used in logs.
    fn name(&self) -> &str;

    /// Sends one message. No retries.
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError>;
}
