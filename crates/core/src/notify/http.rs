//! Form-posting notifiers for Pushover, Prowl and NotifyMyAndroid.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::config::{NmaConfig, NotificationsConfig, ProwlConfig, PushoverConfig};
use super::error::NotifyError;
use super::traits::Notifier;
use super::types::NotificationMessage;

const APPLICATION: &str = "Shortbox";

fn build_client(timeout_secs: u64) -> Result<Client, NotifyError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| NotifyError::ClientBuild(e.to_string()))
}

async fn post_form(
    client: &Client,
    channel: &str,
    url: &str,
    params: &[(&str, String)],
) -> Result<(), NotifyError> {
    let response = client
        .post(url)
        .form(params)
        .send()
        .await
        .map_err(|e| NotifyError::request(channel, e))?;

    let status = response.status();
    if status.is_success() {
        debug!(channel, "notification sent");
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(NotifyError::Rejected {
        channel: channel.to_string(),
        status: status.as_u16(),
        body: body.chars().take(200).collect(),
    })
}

/// Pushover channel.
pub struct PushoverNotifier {
    client: Client,
    config: PushoverConfig,
}

impl PushoverNotifier {
    pub fn new(config: PushoverConfig, timeout_secs: u64) -> Result<Self, NotifyError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            config,
        })
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    fn name(&self) -> &str {
        "pushover"
    }

    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let mut params = vec![
            ("token", self.config.api_token.clone()),
            ("user", self.config.user_key.clone()),
            ("title", message.title.clone()),
            ("message", message.body.clone()),
            ("priority", self.config.priority.to_string()),
        ];
        if let Some(device) = &self.config.device {
            params.push(("device", device.clone()));
        }
        post_form(&self.client, self.name(), &self.config.url, &params).await
    }
}

/// Prowl channel.
pub struct ProwlNotifier {
    client: Client,
    config: ProwlConfig,
}

impl ProwlNotifier {
    pub fn new(config: ProwlConfig, timeout_secs: u64) -> Result<Self, NotifyError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            config,
        })
    }
}

#[async_trait]
impl Notifier for ProwlNotifier {
    fn name(&self) -> &str {
        "prowl"
    }

    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let params = [
            ("apikey", self.config.api_key.clone()),
            ("application", APPLICATION.to_string()),
            ("event", message.title.clone()),
            ("description", message.body.clone()),
            ("priority", self.config.priority.to_string()),
        ];
        post_form(&self.client, self.name(), &self.config.url, &params).await
    }
}

/// NotifyMyAndroid channel.
pub struct NmaNotifier {
    client: Client,
    config: NmaConfig,
}

impl NmaNotifier {
    pub fn new(config: NmaConfig, timeout_secs: u64) -> Result<Self, NotifyError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            config,
        })
    }
}

#[async_trait]
impl Notifier for NmaNotifier {
    fn name(&self) -> &str {
        "nma"
    }

    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let params = [
            ("apikey", self.config.api_key.clone()),
            ("application", APPLICATION.to_string()),
            ("event", message.title.clone()),
            ("description", message.body.clone()),
            ("priority", self.config.priority.to_string()),
        ];
        post_form(&self.client, self.name(), &self.config.url, &params).await
    }
}

/// One notifier per enabled channel.
pub fn build_notifiers(config: &NotificationsConfig) -> Result<Vec<Arc<dyn Notifier>>, NotifyError> {
    let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();
    if let Some(pushover) = config.pushover.as_ref().filter(|c| c.enabled) {
        notifiers.push(Arc::new(PushoverNotifier::new(
            pushover.clone(),
            config.timeout_secs,
        )?));
    }
    if let Some(prowl) = config.prowl.as_ref().filter(|c| c.enabled) {
        notifiers.push(Arc::new(ProwlNotifier::new(prowl.clone(), config.timeout_secs)?));
    }
    if let Some(nma) = config.nma.as_ref().filter(|c| c.enabled) {
        notifiers.push(Arc::new(NmaNotifier::new(nma.clone(), config.timeout_secs)?));
    }
    Ok(notifiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message() -> NotificationMessage {
        NotificationMessage::download_complete("Saga", "2012", "5")
    }

    #[tokio::test]
    async fn test_pushover_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1/messages.json"))
            .and(body_string_contains("token=app"))
            .and(body_string_contains("user=usr"))
            .and(body_string_contains("message=Saga+%282012%29+-+issue+%235"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":1}"#))
            .expect(1)
            .mount(&server)
            .await;

        let config = PushoverConfig::new("app", "usr")
            .with_url(format!("{}/1/messages.json", server.uri()));
        let notifier = PushoverNotifier::new(config, 5).unwrap();
        notifier.notify(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_prowl_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/publicapi/add"))
            .respond_with(ResponseTemplate::new(401).set_body_string("<error code=\"401\"/>"))
            .mount(&server)
            .await;

        let config = ProwlConfig::new("bad").with_url(format!("{}/publicapi/add", server.uri()));
        let notifier = ProwlNotifier::new(config, 5).unwrap();
        let err = notifier.notify(&message()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Rejected { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_nma_posts_event_and_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/publicapi/notify"))
            .and(body_string_contains("apikey=key"))
            .and(body_string_contains("application=Shortbox"))
            .and(body_string_contains("event=Download+and+Post-Processing+completed"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = NmaConfig::new("key").with_url(format!("{}/publicapi/notify", server.uri()));
        NmaNotifier::new(config, 5)
            .unwrap()
            .notify(&message())
            .await
            .unwrap();
    }

    #[test]
    fn test_build_notifiers_skips_disabled() {
        let mut prowl = ProwlConfig::new("key");
        prowl.enabled = false;
        let config = NotificationsConfig {
            pushover: Some(PushoverConfig::new("app", "usr")),
            prowl: Some(prowl),
            nma: Some(NmaConfig::new("key")),
            ..Default::default()
        };

        let notifiers = build_notifiers(&config).unwrap();
        let names: Vec<_> = notifiers.iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["pushover", "nma"]);
    }
}
