//! Credential validation at startup.

use super::Config;
use super::carriers::resolve_gateway;

/// How the process is about to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupMode {
    /// Print reports to the console only.
    AnalyzeOnly,
    /// Run once and send notifications.
    Notify,
    /// Run on the schedule until interrupted.
    Scheduled,
}

impl StartupMode {
    const fn sends_notifications(self) -> bool {
        matches!(self, Self::Notify | Self::Scheduled)
    }
}

/// Errors from validation at startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupValidationError {
    /// An enabled channel lacks the settings it needs to send.
    #[error("Missing required settings for {channel}: {details}")]
    MissingCredentials {
        /// Channel name.
        channel: String,
        /// Which settings are missing.
        details: String,
    },
}

/// Result of startup validation.
#[derive(Debug)]
pub struct StartupValidation {
    /// Whether validation passed.
    pub valid: bool,
    /// Warning messages (non-fatal).
    pub warnings: Vec<String>,
}

impl StartupValidation {
    /// Create a successful validation with warnings.
    #[must_use]
    pub const fn ok_with_warnings(warnings: Vec<String>) -> Self {
        Self {
            valid: true,
            warnings,
        }
    }
}

/// Validate that enabled channels can actually send.
///
/// Console-only analysis never fails here; missing settings only become
/// errors when the run is going to deliver notifications, so no live send is
/// attempted with invented credentials.
pub fn validate_startup(
    config: &Config,
    mode: StartupMode,
) -> Result<StartupValidation, StartupValidationError> {
    let mut warnings = Vec::new();
    let notifications = &config.notifications;

    if !mode.sends_notifications() {
        if notifications.any_enabled() {
            warnings.push(format!(
                "Channels {:?} are enabled but this run only prints to the console",
                notifications.enabled_channels()
            ));
        }
        return Ok(StartupValidation::ok_with_warnings(warnings));
    }

    if !notifications.any_enabled() {
        warnings.push("No notification channels enabled; reports will only be logged".to_string());
    }

    let smtp = &notifications.smtp;
    let mut checks: Vec<(&str, Vec<&str>)> = Vec::new();

    if notifications.ntfy.enabled {
        let mut missing = Vec::new();
        if notifications.ntfy.topic.trim().is_empty() {
            missing.push("ntfy.topic");
        }
        checks.push(("ntfy", missing));
    }

    if notifications.email.enabled {
        let mut missing = Vec::new();
        if !smtp.has_credentials() {
            missing.push("smtp.username/smtp.password");
        }
        if notifications.email.to.is_empty() {
            missing.push("email.to");
        }
        checks.push(("email", missing));
    }

    if notifications.sms.enabled {
        let sms = &notifications.sms;
        let mut missing = Vec::new();
        if !smtp.has_credentials() {
            missing.push("smtp.username/smtp.password");
        }
        if sms.phone_number.chars().filter(char::is_ascii_digit).count() < 10 {
            missing.push("sms.phone_number (10 digits)");
        }
        if sms.gateway_domain.is_none() && resolve_gateway(&sms.carrier).is_none() {
            missing.push("sms.carrier (known carrier) or sms.gateway_domain");
        }
        checks.push(("sms", missing));
    }

    if notifications.webhook.enabled {
        let url = notifications.webhook.url.trim();
        let mut missing = Vec::new();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            missing.push("webhook.url (http/https)");
        }
        checks.push(("webhook", missing));
    }

    if notifications.pushover.enabled {
        let mut missing = Vec::new();
        if notifications.pushover.token.is_empty() {
            missing.push("pushover.token");
        }
        if notifications.pushover.user.is_empty() {
            missing.push("pushover.user");
        }
        checks.push(("pushover", missing));
    }

    if let Some((channel, missing)) = checks.into_iter().find(|(_, m)| !m.is_empty()) {
        return Err(StartupValidationError::MissingCredentials {
            channel: channel.to_string(),
            details: missing.join(", "),
        });
    }

    if mode == StartupMode::Scheduled {
        let symbol_count = config.analysis.symbols.len() as u64;
        let pauses = config
            .schedule
            .symbol_delay_secs
            .saturating_mul(symbol_count.saturating_sub(1));
        if pauses >= config.schedule.cycle_budget().as_secs() {
            warnings.push(format!(
                "Symbol delays ({pauses}s) alone exceed the {}-minute cycle budget",
                config.schedule.max_cycle_minutes
            ));
        }
    }

    Ok(StartupValidation::ok_with_warnings(warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_only_never_fails() {
        let mut config = Config::default();
        config.notifications.email.enabled = true;

        let result = validate_startup(&config, StartupMode::AnalyzeOnly).unwrap();
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn scheduled_requires_ntfy_topic() {
        let mut config = Config::default();
        config.notifications.ntfy.enabled = true;

        let Err(err) = validate_startup(&config, StartupMode::Scheduled) else {
            panic!("expected missing topic");
        };
        assert!(err.to_string().contains("ntfy.topic"));
    }

    #[test]
    fn sms_requires_known_carrier_or_domain() {
        let mut config = Config::default();
        config.notifications.smtp.username = "me@example.com".to_string();
        config.notifications.smtp.password = "app-password".to_string();
        config.notifications.sms.enabled = true;
        config.notifications.sms.phone_number = "(555) 123-4567".to_string();
        config.notifications.sms.carrier = "carrier pigeon".to_string();

        let Err(err) = validate_startup(&config, StartupMode::Notify) else {
            panic!("expected unknown carrier");
        };
        assert!(err.to_string().contains("sms.carrier"));

        config.notifications.sms.carrier = "Mint Mobile".to_string();
        assert!(validate_startup(&config, StartupMode::Notify).is_ok());
    }

    #[test]
    fn no_channels_is_a_warning() {
        let config = Config::default();
        let result = validate_startup(&config, StartupMode::Scheduled).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("No notification channels")));
    }

    #[test]
    fn long_symbol_delays_warn_in_scheduled_mode() {
        let mut config = Config::default();
        config.schedule.symbol_delay_secs = 180;

        let result = validate_startup(&config, StartupMode::Scheduled).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("cycle budget")));
    }

    #[test]
    fn huge_symbol_delay_saturates_instead_of_overflowing() {
        let mut config = Config::default();
        config.schedule.symbol_delay_secs = u64::MAX;
        config.schedule.max_cycle_minutes = u64::MAX;

        let result = validate_startup(&config, StartupMode::Scheduled).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("cycle budget")));
    }
}
