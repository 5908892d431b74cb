//! Mock notifier for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::notify::{NotificationMessage, Notifier, NotifyError};

/// Mock implementation of the Notifier trait.
#[derive(Debug)]
pub struct MockNotifier {
    name: String,
    sent: Arc<RwLock<Vec<NotificationMessage>>>,
    fail: Arc<RwLock<bool>>,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::named("mock")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sent: Arc::new(RwLock::new(Vec::new())),
            fail: Arc::new(RwLock::new(false)),
        }
    }

    /// Make every following send fail.
    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Messages delivered so far.
    pub async fn sent_messages(&self) -> Vec<NotificationMessage> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        if *self.fail.read().await {
            return Err(NotifyError::Rejected {
                channel: self.name.clone(),
                status: 500,
                body: "mock failure".to_string(),
            });
        }
        self.sent.write().await.push(message.clone());
        Ok(())
    }
}
