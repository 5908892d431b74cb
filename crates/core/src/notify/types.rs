//! Types for notifications.

use serde::{Deserialize, Serialize};

/// Title used for completed downloads.
pub const DOWNLOAD_COMPLETE_TITLE: &str = "Download and Post-Processing completed";

/// A short message pushed to every enabled channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub title: String,
    pub body: String,
}

impl NotificationMessage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// `"<series> (<year>) - issue #<issue>"`. The year is omitted with its
    /// brackets when unknown.
    pub fn download_complete(series: &str, year: &str, raw_issue: &str) -> Self {
        let body = if year.is_empty() {
            format!("{} - issue #{}", series, raw_issue)
        } else {
            format!("{} ({}) - issue #{}", series, year, raw_issue)
        };
        Self::new(DOWNLOAD_COMPLETE_TITLE, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_complete_message() {
        let message = NotificationMessage::download_complete("Saga", "2012", "5");
        assert_eq!(message.title, "Download and Post-Processing completed");
        assert_eq!(message.body, "Saga (2012) - issue #5");

        let message = NotificationMessage::download_complete("Saga", "", "5.1");
        assert_eq!(message.body, "Saga - issue #5.1");
    }
}
