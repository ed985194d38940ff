//! Notification channel configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which rendering of a report a channel receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFormat {
    /// Complete report with summary and detailed tables.
    Full,
    /// Best choice plus a short table per week.
    Compact,
    /// One-line summary.
    Sms,
}

/// What happens when a rendered message exceeds a channel's size limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    /// Split on line boundaries and send the parts in sequence.
    Split,
    /// Cut at a line boundary and append the "more in app" marker.
    Truncate,
}

/// When a multi-part message counts as delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPolicy {
    /// Every part must be accepted.
    #[default]
    AllParts,
    /// At least one part must be accepted.
    BestEffort,
}

/// Smallest size limit a channel may be configured with.
pub const MIN_MESSAGE_BYTES: usize = 64;

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Pause between parts of a split message, in milliseconds.
    #[serde(default = "default_part_delay_ms")]
    pub part_delay_ms: u64,
    /// Pause between channels, in milliseconds.
    #[serde(default = "default_channel_delay_ms")]
    pub channel_delay_ms: u64,
    /// Multi-part delivery policy.
    #[serde(default)]
    pub delivery_policy: DeliveryPolicy,
    /// SMTP account shared by email and SMS.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// ntfy push topic.
    #[serde(default)]
    pub ntfy: NtfyConfig,
    /// Email.
    #[serde(default)]
    pub email: EmailConfig,
    /// SMS through a carrier email gateway.
    #[serde(default)]
    pub sms: SmsConfig,
    /// Discord, Slack or generic JSON webhook.
    #[serde(default)]
    pub webhook: WebhookConfig,
    /// Pushover.
    #[serde(default)]
    pub pushover: PushoverConfig,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            part_delay_ms: default_part_delay_ms(),
            channel_delay_ms: default_channel_delay_ms(),
            delivery_policy: DeliveryPolicy::default(),
            smtp: SmtpConfig::default(),
            ntfy: NtfyConfig::default(),
            email: EmailConfig::default(),
            sms: SmsConfig::default(),
            webhook: WebhookConfig::default(),
            pushover: PushoverConfig::default(),
        }
    }
}

impl NotificationsConfig {
    /// Pause between message parts.
    #[must_use]
    pub const fn part_delay(&self) -> Duration {
        Duration::from_millis(self.part_delay_ms)
    }

    /// Pause between channels.
    #[must_use]
    pub const fn channel_delay(&self) -> Duration {
        Duration::from_millis(self.channel_delay_ms)
    }

    /// Names of the enabled channels.
    #[must_use]
    pub fn enabled_channels(&self) -> Vec<&'static str> {
        [
            ("ntfy", self.ntfy.enabled),
            ("email", self.email.enabled),
            ("sms", self.sms.enabled),
            ("webhook", self.webhook.enabled),
            ("pushover", self.pushover.enabled),
        ]
        .into_iter()
        .filter_map(|(name, enabled)| enabled.then_some(name))
        .collect()
    }

    /// Whether any channel is enabled.
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        !self.enabled_channels().is_empty()
    }

    /// Structural checks that do not depend on credentials.
    pub fn validate(&self) -> Result<(), String> {
        let limits = [
            ("ntfy", self.ntfy.max_message_bytes),
            ("email", self.email.max_message_bytes),
            ("sms", self.sms.max_message_bytes),
            ("webhook", self.webhook.max_message_bytes),
            ("pushover", self.pushover.max_message_bytes),
        ];
        for (name, limit) in limits {
            if limit < MIN_MESSAGE_BYTES {
                return Err(format!(
                    "notifications.{name}.max_message_bytes must be at least {MIN_MESSAGE_BYTES}"
                ));
            }
        }
        if self.ntfy.server.trim().is_empty() {
            return Err("notifications.ntfy.server must not be empty".to_string());
        }
        if self.pushover.api_url.trim().is_empty() {
            return Err("notifications.pushover.api_url must not be empty".to_string());
        }
        if self.smtp.port == 0 {
            return Err("notifications.smtp.port must not be 0".to_string());
        }
        Ok(())
    }
}

/// SMTP account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub host: String,
    /// SMTP port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Login user name.
    #[serde(default)]
    pub username: String,
    /// Login password (app password for Gmail).
    #[serde(default)]
    pub password: String,
    /// Sender address. Defaults to the user name.
    #[serde(default)]
    pub from: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from: None,
        }
    }
}

impl SmtpConfig {
    /// Sender address.
    #[must_use]
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.username)
    }

    /// Whether login credentials are present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// ntfy push topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NtfyConfig {
    /// Enable this channel.
    #[serde(default)]
    pub enabled: bool,
    /// ntfy server.
    #[serde(default = "default_ntfy_server")]
    pub server: String,
    /// Topic name.
    #[serde(default)]
    pub topic: String,
    /// Priority header.
    #[serde(default = "default_ntfy_priority")]
    pub priority: String,
    /// Tags header entries.
    #[serde(default = "default_ntfy_tags")]
    pub tags: Vec<String>,
    /// Rendering sent to this channel.
    #[serde(default = "default_compact")]
    pub format: MessageFormat,
    /// Size limit per message.
    #[serde(default = "default_ntfy_max")]
    pub max_message_bytes: usize,
    /// Behaviour above the size limit.
    #[serde(default = "default_truncate")]
    pub overflow: Overflow,
}

impl Default for NtfyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            server: default_ntfy_server(),
            topic: String::new(),
            priority: default_ntfy_priority(),
            tags: default_ntfy_tags(),
            format: MessageFormat::Compact,
            max_message_bytes: default_ntfy_max(),
            overflow: Overflow::Truncate,
        }
    }
}

/// Email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Enable this channel.
    #[serde(default)]
    pub enabled: bool,
    /// Recipients.
    #[serde(default)]
    pub to: Vec<String>,
    /// Subject prefix; the symbol is appended.
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    /// Rendering sent to this channel.
    #[serde(default = "default_full")]
    pub format: MessageFormat,
    /// Size limit per message.
    #[serde(default = "default_email_max")]
    pub max_message_bytes: usize,
    /// Behaviour above the size limit.
    #[serde(default = "default_split")]
    pub overflow: Overflow,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            to: Vec::new(),
            subject_prefix: default_subject_prefix(),
            format: MessageFormat::Full,
            max_message_bytes: default_email_max(),
            overflow: Overflow::Split,
        }
    }
}

/// SMS through a carrier email gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    /// Enable this channel.
    #[serde(default)]
    pub enabled: bool,
    /// Phone number; non-digits are ignored.
    #[serde(default)]
    pub phone_number: String,
    /// Carrier name (verizon, att, tmobile, ...).
    #[serde(default)]
    pub carrier: String,
    /// Gateway domain override for carriers not in the built-in table.
    #[serde(default)]
    pub gateway_domain: Option<String>,
    /// Rendering sent to this channel.
    #[serde(default = "default_sms_format")]
    pub format: MessageFormat,
    /// Size limit per message.
    #[serde(default = "default_sms_max")]
    pub max_message_bytes: usize,
    /// Behaviour above the size limit.
    #[serde(default = "default_split")]
    pub overflow: Overflow,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            phone_number: String::new(),
            carrier: String::new(),
            gateway_domain: None,
            format: MessageFormat::Sms,
            max_message_bytes: default_sms_max(),
            overflow: Overflow::Split,
        }
    }
}

/// Payload shape of a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookKind {
    /// `{"message": ...}`.
    #[default]
    Generic,
    /// `{"content": ..., "username": ...}`.
    Discord,
    /// `{"text": ..., "username": ...}`.
    Slack,
}

/// Webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Enable this channel.
    #[serde(default)]
    pub enabled: bool,
    /// Target URL.
    #[serde(default)]
    pub url: String,
    /// Payload shape.
    #[serde(default)]
    pub kind: WebhookKind,
    /// Display name for Discord and Slack.
    #[serde(default = "default_webhook_username")]
    pub username: String,
    /// Rendering sent to this channel.
    #[serde(default = "default_compact")]
    pub format: MessageFormat,
    /// Size limit per message.
    #[serde(default = "default_webhook_max")]
    pub max_message_bytes: usize,
    /// Behaviour above the size limit.
    #[serde(default = "default_split")]
    pub overflow: Overflow,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            kind: WebhookKind::Generic,
            username: default_webhook_username(),
            format: MessageFormat::Compact,
            max_message_bytes: default_webhook_max(),
            overflow: Overflow::Split,
        }
    }
}

/// Pushover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushoverConfig {
    /// Enable this channel.
    #[serde(default)]
    pub enabled: bool,
    /// Messages endpoint.
    #[serde(default = "default_pushover_url")]
    pub api_url: String,
    /// Application token.
    #[serde(default)]
    pub token: String,
    /// User key.
    #[serde(default)]
    pub user: String,
    /// Rendering sent to this channel.
    #[serde(default = "default_compact")]
    pub format: MessageFormat,
    /// Size limit per message.
    #[serde(default = "default_pushover_max")]
    pub max_message_bytes: usize,
    /// Behaviour above the size limit.
    #[serde(default = "default_split")]
    pub overflow: Overflow,
}

impl Default for PushoverConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_pushover_url(),
            token: String::new(),
            user: String::new(),
            format: MessageFormat::Compact,
            max_message_bytes: default_pushover_max(),
            overflow: Overflow::Split,
        }
    }
}

const fn default_part_delay_ms() -> u64 {
    1_000
}

const fn default_channel_delay_ms() -> u64 {
    1_000
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_ntfy_server() -> String {
    "https://ntfy.sh".to_string()
}

fn default_ntfy_priority() -> String {
    "urgent".to_string()
}

fn default_ntfy_tags() -> Vec<String> {
    vec!["chart_with_upwards_trend".to_string()]
}

const fn default_ntfy_max() -> usize {
    3_900
}

fn default_subject_prefix() -> String {
    "Options Alert".to_string()
}

const fn default_email_max() -> usize {
    100_000
}

const fn default_sms_max() -> usize {
    160
}

fn default_webhook_username() -> String {
    "Options Analyzer".to_string()
}

const fn default_webhook_max() -> usize {
    2_000
}

fn default_pushover_url() -> String {
    "https://api.pushover.net/1/messages.json".to_string()
}

const fn default_pushover_max() -> usize {
    1_024
}

const fn default_compact() -> MessageFormat {
    MessageFormat::Compact
}

const fn default_full() -> MessageFormat {
    MessageFormat::Full
}

const fn default_sms_format() -> MessageFormat {
    MessageFormat::Sms
}

const fn default_split() -> Overflow {
    Overflow::Split
}

const fn default_truncate() -> Overflow {
    Overflow::Truncate
}
