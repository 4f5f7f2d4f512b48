use super::Notifier;
use crate::error::{webhook_error, ReminderResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{info, warn};

/// Sends reminders as `GET {url}?phone=..&msg=..`
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, phone: &str, message: &str) -> ReminderResult<StatusCode> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("phone", phone), ("msg", message)])
            .send()
            .await
            .map_err(|e| webhook_error(&format!("Failed to send webhook: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            info!("Webhook sent! Status: {}", status);
        } else {
            warn!("Webhook answered with status {}", status);
        }

        Ok(status)
    }
}
