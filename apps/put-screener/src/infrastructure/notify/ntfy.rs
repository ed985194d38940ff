//! ntfy push notifications.
//!
//! Plain-text POST to `{server}/{topic}` with Title, Priority and Tags headers.

use async_trait::async_trait;
use reqwest::Client;

use crate::application::ports::{Notification, NotificationChannel};
use crate::config::{MessageFormat, NtfyConfig, Overflow};

use super::http::{report, send_checked};

/// ntfy topic channel.
#[derive(Debug, Clone)]
pub struct NtfyChannel {
    client: Client,
    url: String,
    priority: String,
    tags: String,
    format: MessageFormat,
    max_message_bytes: usize,
    overflow: Overflow,
}

impl NtfyChannel {
    /// Create the channel.
    #[must_use]
    pub fn new(client: Client, config: &NtfyConfig) -> Self {
        Self {
            client,
            url: format!(
                "{}/{}",
                config.server.trim_end_matches('/'),
                config.topic.trim()
            ),
            priority: config.priority.clone(),
            tags: config.tags.join(","),
            format: config.format,
            max_message_bytes: config.max_message_bytes,
            overflow: config.overflow,
        }
    }
}

#[async_trait]
impl NotificationChannel for NtfyChannel {
    fn name(&self) -> &'static str {
        "ntfy"
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
        let mut request = self
            .client
            .post(&self.url)
            .header("Title", notification.title.as_str())
            .header("Priority", self.priority.as_str())
            .body(notification.body.clone());
        if !self.tags.is_empty() {
            request = request.header("Tags", self.tags.as_str());
        }

        report(self.name(), &notification.symbol, send_checked(request).await)
    }
}
