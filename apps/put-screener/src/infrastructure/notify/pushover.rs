//! Pushover push notifications (form POST).

use async_trait::async_trait;
use reqwest::Client;

use crate::application::ports::{Notification, NotificationChannel};
use crate::config::{MessageFormat, Overflow, PushoverConfig};

use super::http::{report, send_checked};

/// Pushover channel.
#[derive(Debug, Clone)]
pub struct PushoverChannel {
    client: Client,
    api_url: String,
    token: String,
    user: String,
    format: MessageFormat,
    max_message_bytes: usize,
    overflow: Overflow,
}

impl PushoverChannel {
    /// Create the channel.
    #[must_use]
    pub fn new(client: Client, config: &PushoverConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
            user: config.user.clone(),
            format: config.format,
            max_message_bytes: config.max_message_bytes,
            overflow: config.overflow,
        }
    }
}

#[async_trait]
impl NotificationChannel for PushoverChannel {
    fn name(&self) -> &'static str {
        "pushover"
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
        let form = [
            ("token", self.token.as_str()),
            ("user", self.user.as_str()),
            ("title", notification.title.as_str()),
            ("message", notification.body.as_str()),
        ];
        let request = self.client.post(&self.api_url).form(&form);
        report(self.name(), &notification.symbol, send_checked(request).await)
    }
}
