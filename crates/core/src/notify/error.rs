//! Error types for the notify module.

use thiserror::Error;

/// Errors that can occur while sending a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// Request did not complete.
    #[error("{channel} request failed: {reason}")]
    Request { channel: String, reason: String },

    /// Service answered with a non-success status.
    #[error("{channel} rejected notification (HTTP {status}): {body}")]
    Rejected {
        channel: String,
        status: u16,
        body: String,
    },
}

impl NotifyError {
    pub fn request(channel: &str, err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "timed out".to_string()
        } else {
            err.to_string()
        };
        NotifyError::Request {
            channel: channel.to_string(),
            reason,
        }
    }
}
