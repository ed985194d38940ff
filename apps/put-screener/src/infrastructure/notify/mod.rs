//! Notification channels.
//!
//! Every channel implements [`NotificationChannel`](crate::application::ports::NotificationChannel).
//! [`build_channels`] turns the `notifications` config section into the
//! list of enabled channels.

mod email;
mod http;
mod ntfy;
mod pushover;
mod sms;
mod webhook;

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{Mailer, NotificationChannel, NotifyError};
use crate::config::{NotificationsConfig, supported_carriers};

pub use email::{EmailChannel, SmtpMailer};
pub use http::build_client;
pub use ntfy::NtfyChannel;
pub use pushover::PushoverChannel;
pub use sms::SmsChannel;
pub use webhook::WebhookChannel;

/// Timeout of a single notification request.
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(15);

/// Build every enabled channel, in dispatch order (ntfy, email, SMS,
/// webhook, Pushover).
///
/// # Errors
///
/// Returns error if the HTTP client or the SMTP mailer cannot be built.
pub fn build_channels(
    config: &NotificationsConfig,
) -> Result<Vec<Box<dyn NotificationChannel>>, NotifyError> {
    let client = build_client(NOTIFY_TIMEOUT)?;
    let mut channels: Vec<Box<dyn NotificationChannel>> = Vec::new();

    let mailer: Option<Arc<dyn Mailer>> = if config.email.enabled || config.sms.enabled {
        Some(Arc::new(SmtpMailer::new(&config.smtp)?))
    } else {
        None
    };

    if config.ntfy.enabled {
        channels.push(Box::new(NtfyChannel::new(client.clone(), &config.ntfy)));
    }
    if let Some(mailer) = &mailer {
        if config.email.enabled {
            channels.push(Box::new(EmailChannel::new(Arc::clone(mailer), &config.email)));
        }
        if config.sms.enabled {
            match SmsChannel::new(Arc::clone(mailer), &config.sms) {
                Some(channel) => channels.push(Box::new(channel)),
                None => tracing::error!(
                    carrier = %config.sms.carrier,
                    supported = ?supported_carriers(),
                    "Unsupported SMS carrier, channel disabled"
                ),
            }
        }
    }
    if config.webhook.enabled {
        channels.push(Box::new(WebhookChannel::new(client.clone(), &config.webhook)));
    }
    if config.pushover.enabled {
        channels.push(Box::new(PushoverChannel::new(client, &config.pushover)));
    }

    Ok(channels)
}
