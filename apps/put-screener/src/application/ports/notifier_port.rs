//! Notifier Port (Driven Port)
//!
//! A notification channel is one outbound transport (ntfy, email, SMS,
//! webhook, Pushover). Channels never fail: transport errors are logged and
//! reported as `false` so one broken channel cannot stop the others.

use async_trait::async_trait;

use crate::config::{MessageFormat, Overflow};

/// One message part ready for a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short title (push title, email subject).
    pub title: String,
    /// Message text.
    pub body: String,
    /// Symbol the message is about.
    pub symbol: String,
}

impl Notification {
    /// Create a notification.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            symbol: symbol.into(),
        }
    }
}

/// Transport-level notification error, logged by channels before they
/// report failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotifyError {
    /// Request could not be sent.
    #[error("Notification transport error: {message}")]
    Transport {
        /// Error details.
        message: String,
    },

    /// Remote side answered with a non-success status.
    #[error("Notification rejected with HTTP {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body (possibly truncated).
        body: String,
    },

    /// Message could not be built.
    #[error("Invalid notification: {message}")]
    Invalid {
        /// Error details.
        message: String,
    },
}

/// A single outbound notification transport.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Channel name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Rendering this channel receives.
    fn format(&self) -> MessageFormat;

    /// Maximum message size in bytes.
    fn max_message_len(&self) -> usize;

    /// What to do with messages over the limit.
    fn overflow(&self) -> Overflow;

    /// Send one message part. Returns whether the transport accepted it.
    async fn send(&self, notification: &Notification) -> bool;
}

/// SMTP transport seam used by the email and SMS channels.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a plain-text mail to all recipients.
    async fn send_mail(&self, to: &[String], subject: &str, body: &str)
    -> Result<(), NotifyError>;
}
