//! Configuration for notification channels.

use serde::{Deserialize, Serialize};

/// All notification channels. A channel is used when its section is
/// present and `enabled` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushover: Option<PushoverConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prowl: Option<ProwlConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nma: Option<NmaConfig>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Pushover channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushoverConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Application API token.
    pub api_token: String,
    /// User or group key.
    pub user_key: String,
    #[serde(default)]
    pub priority: i8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default = "default_pushover_url")]
    pub url: String,
}

/// Prowl channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProwlConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub api_key: String,
    #[serde(default)]
    pub priority: i8,
    #[serde(default = "default_prowl_url")]
    pub url: String,
}

/// NotifyMyAndroid channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NmaConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub api_key: String,
    #[serde(default)]
    pub priority: i8,
    #[serde(default = "default_nma_url")]
    pub url: String,
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    10
}

fn default_pushover_url() -> String {
    "https://api.pushover.net/1/messages.json".to_string()
}

fn default_prowl_url() -> String {
    "https://api.prowlapp.com/publicapi/add".to_string()
}

fn default_nma_url() -> String {
    "https://www.notifymyandroid.com/publicapi/notify".to_string()
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            pushover: None,
            prowl: None,
            nma: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl PushoverConfig {
    pub fn new(api_token: impl Into<String>, user_key: impl Into<String>) -> Self {
        Self {
            enabled: true,
            api_token: api_token.into(),
            user_key: user_key.into(),
            priority: 0,
            device: None,
            url: default_pushover_url(),
        }
    }

    /// Points the channel at a different endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl ProwlConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            enabled: true,
            api_key: api_key.into(),
            priority: 0,
            url: default_prowl_url(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl NmaConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            enabled: true,
            api_key: api_key.into(),
            priority: 0,
            url: default_nma_url(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_default_to_enabled() {
        let config: NotificationsConfig = toml::from_str(
            r#"
[pushover]
api_token = "app"
user_key = "user"

[prowl]
api_key = "key"
enabled = false
"#,
        )
        .unwrap();

        let pushover = config.pushover.unwrap();
        assert!(pushover.enabled);
        assert_eq!(pushover.url, "https://api.pushover.net/1/messages.json");
        assert!(!config.prowl.unwrap().enabled);
        assert!(config.nma.is_none());
        assert_eq!(config.timeout_secs, 10);
    }
}
