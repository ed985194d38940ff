//! Email delivery over SMTP.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::application::ports::{Mailer, Notification, NotificationChannel, NotifyError};
use crate::config::{EmailConfig, MessageFormat, Overflow, SmtpConfig};

use super::http::report;

/// Port that uses implicit TLS instead of STARTTLS.
const SMTPS_PORT: u16 = 465;

/// Pooled async SMTP mailer.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

fn invalid(e: impl std::fmt::Display) -> NotifyError {
    NotifyError::Invalid {
        message: e.to_string(),
    }
}

impl SmtpMailer {
    /// Create a mailer for the configured relay.
    ///
    /// # Errors
    ///
    /// Returns error if the sender address or relay host is invalid.
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let from: Mailbox = config.sender().parse().map_err(invalid)?;

        let builder = if config.port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| NotifyError::Transport {
            message: e.to_string(),
        })?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_mail(
        &self,
        to: &[String],
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        for address in to {
            builder = builder.to(address.parse().map_err(invalid)?);
        }
        let message = builder.body(body.to_string()).map_err(invalid)?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| NotifyError::Transport {
                message: e.to_string(),
            })
    }
}

/// Email channel.
pub struct EmailChannel {
    mailer: Arc<dyn Mailer>,
    to: Vec<String>,
    subject_prefix: String,
    format: MessageFormat,
    max_message_bytes: usize,
    overflow: Overflow,
}

impl std::fmt::Debug for EmailChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailChannel")
            .field("to", &self.to)
            .field("subject_prefix", &self.subject_prefix)
            .finish_non_exhaustive()
    }
}

impl EmailChannel {
    /// Create the channel.
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>, config: &EmailConfig) -> Self {
        Self {
            mailer,
            to: config.to.clone(),
            subject_prefix: config.subject_prefix.clone(),
            format: config.format,
            max_message_bytes: config.max_message_bytes,
            overflow: config.overflow,
        }
    }

    fn subject(&self, notification: &Notification) -> String {
        if self.subject_prefix.is_empty() {
            notification.title.clone()
        } else {
            format!("{} - {}", self.subject_prefix, notification.title)
        }
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
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
        let result = self
            .mailer
            .send_mail(&self.to, &self.subject(notification), &notification.body)
            .await;
        report(self.name(), &notification.symbol, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockMailer;
    use mockall::predicate::eq;

    fn config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            to: vec!["me@example.com".to_string()],
            ..EmailConfig::default()
        }
    }

    #[tokio::test]
    async fn sends_with_prefixed_subject() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send_mail()
            .with(
                eq(vec!["me@example.com".to_string()]),
                eq("Options Alert - AAPL Options Alert"),
                eq("body"),
            )
            .times(1)
            .returning(|_, _, _| Ok(()));

        let channel = EmailChannel::new(Arc::new(mailer), &config());
        let sent = channel
            .send(&Notification::new("AAPL Options Alert", "body", "AAPL"))
            .await;
        assert!(sent);
    }

    #[tokio::test]
    async fn transport_error_is_false() {
        let mut mailer = MockMailer::new();
        mailer.expect_send_mail().returning(|_, _, _| {
            Err(NotifyError::Transport {
                message: "connection refused".to_string(),
            })
        });

        let channel = EmailChannel::new(Arc::new(mailer), &config());
        assert!(!channel.send(&Notification::new("t", "b", "AAPL")).await);
    }

    #[test]
    fn mailer_rejects_bad_sender() {
        let smtp = SmtpConfig {
            username: "not an address".to_string(),
            password: "secret".to_string(),
            ..SmtpConfig::default()
        };
        assert!(matches!(
            SmtpMailer::new(&smtp),
            Err(NotifyError::Invalid { .. })
        ));
    }
}
