//! Notification Dispatcher
//!
//! Renders a [`StockReport`] once per channel in the format that channel
//! wants, fits it to the channel's size limit and sends it. Channels are
//! served one after another with a pause in between, and a failing channel
//! never prevents the rest from being tried.

use std::time::Duration;

use crate::application::ports::{Notification, NotificationChannel};
use crate::config::{DeliveryPolicy, NotificationsConfig, Overflow};
use crate::domain::StockReport;
use crate::observability;
use crate::report::{ReportFormatter, bounded, split_message};

/// Delivery result of one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOutcome {
    /// Channel name.
    pub channel: &'static str,
    /// Parts the message was sent in.
    pub parts: usize,
    /// Parts the transport accepted.
    pub sent: usize,
    /// Whether the message counts as delivered under the delivery policy.
    pub delivered: bool,
}

/// Delivery results of one report across all channels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchReport {
    /// Symbol the report was about.
    pub symbol: String,
    /// One outcome per channel, in dispatch order.
    pub outcomes: Vec<ChannelOutcome>,
}

impl DispatchReport {
    /// At least one channel delivered.
    #[must_use]
    pub fn delivered(&self) -> bool {
        self.outcomes.iter().any(|o| o.delivered)
    }

    /// Names of channels that did not deliver.
    #[must_use]
    pub fn failed_channels(&self) -> Vec<&'static str> {
        self.outcomes
            .iter()
            .filter(|o| !o.delivered)
            .map(|o| o.channel)
            .collect()
    }
}

/// Sends stock reports to every configured channel.
pub struct NotificationDispatcher {
    channels: Vec<Box<dyn NotificationChannel>>,
    formatter: ReportFormatter,
    policy: DeliveryPolicy,
    part_delay: Duration,
    channel_delay: Duration,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field(
                "channels",
                &self.channels.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("policy", &self.policy)
            .field("part_delay", &self.part_delay)
            .field("channel_delay", &self.channel_delay)
            .finish_non_exhaustive()
    }
}

impl NotificationDispatcher {
    /// Create a dispatcher over the given channels.
    #[must_use]
    pub fn new(
        channels: Vec<Box<dyn NotificationChannel>>,
        formatter: ReportFormatter,
        config: &NotificationsConfig,
    ) -> Self {
        Self {
            channels,
            formatter,
            policy: config.delivery_policy,
            part_delay: config.part_delay(),
            channel_delay: config.channel_delay(),
        }
    }

    /// Number of channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Whether there is nothing to dispatch to.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Send `report` to every channel.
    pub async fn dispatch(&self, report: &StockReport) -> DispatchReport {
        let title = format!("{} Options Alert", report.symbol);
        let mut outcomes = Vec::with_capacity(self.channels.len());

        for (index, channel) in self.channels.iter().enumerate() {
            if index > 0 && !self.channel_delay.is_zero() {
                tokio::time::sleep(self.channel_delay).await;
            }

            let text = self.formatter.render(report, channel.format());
            let outcome = self
                .send_text(channel.as_ref(), &title, &text, &report.symbol)
                .await;
            outcomes.push(outcome);
        }

        let dispatch = DispatchReport {
            symbol: report.symbol.clone(),
            outcomes,
        };
        if dispatch.delivered() {
            tracing::info!(
                symbol = %report.symbol,
                failed = ?dispatch.failed_channels(),
                "Report dispatched"
            );
        } else {
            tracing::error!(symbol = %report.symbol, "Report not delivered on any channel");
        }
        dispatch
    }

    async fn send_text(
        &self,
        channel: &dyn NotificationChannel,
        title: &str,
        text: &str,
        symbol: &str,
    ) -> ChannelOutcome {
        let limit = channel.max_message_len();
        let parts = match channel.overflow() {
            Overflow::Truncate => vec![bounded(text, limit)],
            Overflow::Split => split_message(text, limit),
        };
        let total = parts.len();

        let mut sent = 0;
        for (index, body) in parts.into_iter().enumerate() {
            if index > 0 && !self.part_delay.is_zero() {
                tokio::time::sleep(self.part_delay).await;
            }

            let part_title = if total > 1 {
                format!("{title} ({}/{total})", index + 1)
            } else {
                title.to_string()
            };
            let notification = Notification::new(part_title, body, symbol);

            if channel.send(&notification).await {
                sent += 1;
            } else {
                tracing::error!(
                    channel = channel.name(),
                    symbol = %symbol,
                    part = index + 1,
                    parts = total,
                    "Notification part failed"
                );
            }
        }

        let delivered = total > 0
            && match self.policy {
                DeliveryPolicy::AllParts => sent == total,
                DeliveryPolicy::BestEffort => sent > 0,
            };
        observability::record_notification(channel.name(), delivered);

        ChannelOutcome {
            channel: channel.name(),
            parts: total,
            sent,
            delivered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MessageFormat;
    use crate::domain::Quote;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // Records every part; fails the parts whose 1-based index is listed.
    struct RecordingChannel {
        name: &'static str,
        format: MessageFormat,
        limit: usize,
        overflow: Overflow,
        fail_parts: Vec<usize>,
        received: Arc<Mutex<Vec<Notification>>>,
    }

    impl RecordingChannel {
        fn new(name: &'static str, limit: usize, overflow: Overflow) -> Self {
            Self {
                name,
                format: MessageFormat::Full,
                limit,
                overflow,
                fail_parts: Vec::new(),
                received: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl NotificationChannel for RecordingChannel {
        fn name(&self) -> &'static str {
            self.name
        }

        fn format(&self) -> MessageFormat {
            self.format
        }

        fn max_message_len(&self) -> usize {
            self.limit
        }

        fn overflow(&self) -> Overflow {
            self.overflow
        }

        async fn send(&self, notification: &Notification) -> bool {
            let mut received = self.received.lock().unwrap();
            received.push(notification.clone());
            !self.fail_parts.contains(&received.len())
        }
    }

    fn report() -> StockReport {
        StockReport {
            symbol: "NVDA".to_string(),
            quote: Quote::new(
                "NVDA",
                dec!(180.25),
                Utc.with_ymd_and_hms(2025, 8, 8, 14, 30, 0).unwrap(),
            ),
            weeks: Vec::new(),
            absolute_best: None,
        }
    }

    fn config(policy: DeliveryPolicy) -> NotificationsConfig {
        NotificationsConfig {
            part_delay_ms: 0,
            channel_delay_ms: 0,
            delivery_policy: policy,
            ..NotificationsConfig::default()
        }
    }

    #[tokio::test]
    async fn splits_long_message_into_titled_parts() {
        let channel = RecordingChannel::new("test", 120, Overflow::Split);
        let received = Arc::clone(&channel.received);
        let dispatcher = NotificationDispatcher::new(
            vec![Box::new(channel)],
            ReportFormatter::default(),
            &config(DeliveryPolicy::AllParts),
        );

        let result = dispatcher.dispatch(&report()).await;

        let parts = received.lock().unwrap();
        assert!(parts.len() > 1);
        assert!(parts.iter().all(|n| n.body.len() <= 120));
        assert_eq!(parts[0].title, format!("NVDA Options Alert (1/{})", parts.len()));
        assert!(result.delivered());
        assert_eq!(result.outcomes[0].sent, parts.len());
    }

    #[tokio::test]
    async fn all_parts_policy_requires_every_part() {
        let mut channel = RecordingChannel::new("test", 120, Overflow::Split);
        channel.fail_parts = vec![2];
        let received = Arc::clone(&channel.received);
        let dispatcher = NotificationDispatcher::new(
            vec![Box::new(channel)],
            ReportFormatter::default(),
            &config(DeliveryPolicy::AllParts),
        );

        let result = dispatcher.dispatch(&report()).await;

        let outcome = &result.outcomes[0];
        // remaining parts are still attempted
        assert_eq!(received.lock().unwrap().len(), outcome.parts);
        assert_eq!(outcome.sent, outcome.parts - 1);
        assert!(!outcome.delivered);
        assert!(!result.delivered());
    }

    #[tokio::test]
    async fn best_effort_policy_accepts_partial_delivery() {
        let mut channel = RecordingChannel::new("test", 120, Overflow::Split);
        channel.fail_parts = vec![1];
        let dispatcher = NotificationDispatcher::new(
            vec![Box::new(channel)],
            ReportFormatter::default(),
            &config(DeliveryPolicy::BestEffort),
        );

        let result = dispatcher.dispatch(&report()).await;
        assert!(result.outcomes[0].delivered);
    }

    #[tokio::test]
    async fn message_without_parts_is_not_delivered() {
        let channel = RecordingChannel::new("test", 4, Overflow::Split);
        let received = Arc::clone(&channel.received);
        let dispatcher = NotificationDispatcher::new(
            Vec::new(),
            ReportFormatter::default(),
            &config(DeliveryPolicy::AllParts),
        );

        let outcome = dispatcher
            .send_text(&channel, "NVDA Options Alert", "\n\n\n\n\n\n", "NVDA")
            .await;

        assert_eq!(outcome.parts, 0);
        assert_eq!(outcome.sent, 0);
        assert!(!outcome.delivered);
        assert!(received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn truncating_channel_gets_one_bounded_part() {
        let channel = RecordingChannel::new("push", 200, Overflow::Truncate);
        let received = Arc::clone(&channel.received);
        let dispatcher = NotificationDispatcher::new(
            vec![Box::new(channel)],
            ReportFormatter::default(),
            &config(DeliveryPolicy::AllParts),
        );

        dispatcher.dispatch(&report()).await;

        let parts = received.lock().unwrap();
        assert_eq!(parts.len(), 1);
        assert!(parts[0].body.len() <= 200);
        assert!(parts[0].body.ends_with(crate::report::MORE_MARKER));
    }

    #[tokio::test]
    async fn one_failing_channel_does_not_stop_others() {
        let mut broken = RecordingChannel::new("broken", 100_000, Overflow::Split);
        broken.fail_parts = vec![1];
        let mut sms = RecordingChannel::new("sms", 160, Overflow::Split);
        sms.format = MessageFormat::Sms;
        let sms_received = Arc::clone(&sms.received);

        let dispatcher = NotificationDispatcher::new(
            vec![Box::new(broken), Box::new(sms)],
            ReportFormatter::default(),
            &config(DeliveryPolicy::AllParts),
        );

        let result = dispatcher.dispatch(&report()).await;

        assert!(result.delivered());
        assert_eq!(result.failed_channels(), vec!["broken"]);
        let sms_parts = sms_received.lock().unwrap();
        assert_eq!(sms_parts.len(), 1);
        assert!(sms_parts[0].body.starts_with("NVDA $180.25 - No pick"));
    }
}
