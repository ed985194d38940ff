//! Chat webhooks (Discord, Slack, generic JSON).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::application::ports::{Notification, NotificationChannel};
use crate::config::{MessageFormat, Overflow, WebhookConfig, WebhookKind};

use super::http::{report, send_checked};

/// Webhook channel.
#[derive(Debug, Clone)]
pub struct WebhookChannel {
    client: Client,
    url: String,
    kind: WebhookKind,
    username: String,
    format: MessageFormat,
    max_message_bytes: usize,
    overflow: Overflow,
}

impl WebhookChannel {
    /// Create the channel.
    #[must_use]
    pub fn new(client: Client, config: &WebhookConfig) -> Self {
        Self {
            client,
            url: config.url.trim().to_string(),
            kind: config.kind,
            username: config.username.clone(),
            format: config.format,
            max_message_bytes: config.max_message_bytes,
            overflow: config.overflow,
        }
    }

    fn payload(&self, body: &str) -> Value {
        match self.kind {
            WebhookKind::Discord => json!({ "content": body, "username": self.username }),
            WebhookKind::Slack => json!({ "text": body, "username": self.username }),
            WebhookKind::Generic => json!({ "message": body }),
        }
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn format(&self) -> MessageFormat {
        self.format
    }

    fn max_message_len(&self) -> usize {
        self.max_message_bytes
    }

    fn overflow(&self) -> Overflow {
        self.overflow
    }

    async fn send(&self, notification: &Notification) -> bool {
        let request = self
            .client
            .post(&self.url)
            .json(&self.payload(&notification.body));
        report(self.name(), &notification.symbol, send_checked(request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(WebhookKind::Discord, "content" ; "discord")]
    #[test_case(WebhookKind::Slack, "text" ; "slack")]
    #[test_case(WebhookKind::Generic, "message" ; "generic")]
    fn payload_uses_platform_field(kind: WebhookKind, field: &str) {
        let config = WebhookConfig {
            kind,
            url: "https://example.com/hook".to_string(),
            ..WebhookConfig::default()
        };
        let channel = WebhookChannel::new(Client::new(), &config);
        let payload = channel.payload("hello");
        assert_eq!(payload[field], "hello");
    }
}
