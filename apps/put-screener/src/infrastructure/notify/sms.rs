//! SMS through carrier email-to-SMS gateways.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{Mailer, Notification, NotificationChannel};
use crate::config::{MessageFormat, Overflow, SmsConfig, resolve_gateway};

use super::http::report;

/// Gateway address for a phone number: digits only, at the gateway domain.
#[must_use]
pub fn gateway_address(phone_number: &str, domain: &str) -> String {
    let digits: String = phone_number.chars().filter(char::is_ascii_digit).collect();
    format!("{digits}@{domain}")
}

/// SMS channel.
pub struct SmsChannel {
    mailer: Arc<dyn Mailer>,
    address: String,
    format: MessageFormat,
    max_message_bytes: usize,
    overflow: Overflow,
}

impl std::fmt::Debug for SmsChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsChannel")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl SmsChannel {
    /// Create the channel. `None` when the carrier is unknown and no
    /// explicit gateway domain is configured.
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>, config: &SmsConfig) -> Option<Self> {
        let domain = match &config.gateway_domain {
            Some(domain) => domain.as_str(),
            None => resolve_gateway(&config.carrier)?,
        };

        Some(Self {
            mailer,
            address: gateway_address(&config.phone_number, domain),
            format: config.format,
            max_message_bytes: config.max_message_bytes,
            overflow: config.overflow,
        })
    }

    /// Gateway address messages are sent to.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    fn name(&self) -> &'static str {
        "sms"
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
        // Gateways prepend the subject to the text, so it stays empty.
        let result = self
            .mailer
            .send_mail(std::slice::from_ref(&self.address), "", &notification.body)
            .await;
        report(self.name(), &notification.symbol, result)
    }
}
