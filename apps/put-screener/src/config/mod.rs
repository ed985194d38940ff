//! Configuration module for the put screener.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for every component.
//!
//! # Usage
//!
//! ```rust,ignore
//! use put_screener::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("deploy/screener.yaml"))?;
//!
//! println!("symbols: {:?}", config.analysis.symbols);
//! ```

mod analysis;
mod carriers;
mod market_data;
mod notifications;
mod observability;
mod pricing;
mod report;
mod schedule;
mod screening;
mod validation;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use analysis::AnalysisConfig;
pub use carriers::{resolve_gateway, supported_carriers};
pub use market_data::{MarketDataConfig, RetrySettings};
pub use notifications::{
    DeliveryPolicy, EmailConfig, MessageFormat, NotificationsConfig, NtfyConfig, Overflow,
    PushoverConfig, SmsConfig, SmtpConfig, WebhookConfig, WebhookKind,
};
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use pricing::PricingConfig;
pub use report::ReportConfig;
pub use schedule::ScheduleConfig;
pub use screening::ScreeningConfig;
pub use validation::{StartupMode, StartupValidation, StartupValidationError, validate_startup};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Whether the error is a missing configuration file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ReadError { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Root configuration structure.
///
/// Every section has defaults, so an empty document is a valid configuration
/// for console-only analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Which symbols and expirations to analyze.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Risk model parameters.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Strike selection, tiers and pick rules.
    #[serde(default)]
    pub screening: ScreeningConfig,
    /// Report layout.
    #[serde(default)]
    pub report: ReportConfig,
    /// Notification channels.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Scheduled runner.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Market data provider.
    #[serde(default)]
    pub market_data: MarketDataConfig,
    /// Logging and metrics.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let invalid = |msg: &str| Err(ConfigError::ValidationError(msg.to_string()));

    // Analysis
    if config.analysis.symbols.is_empty() {
        return invalid("analysis.symbols must not be empty");
    }
    if config.analysis.symbols.iter().any(|s| s.trim().is_empty()) {
        return invalid("analysis.symbols must not contain blank entries");
    }
    if !(1..=12).contains(&config.analysis.weeks) {
        return invalid("analysis.weeks must be between 1 and 12");
    }

    // Pricing
    if !(0.0..=1.0).contains(&config.pricing.risk_free_rate) {
        return invalid("pricing.risk_free_rate must be between 0.0 and 1.0");
    }
    if !(0.0..=1.0).contains(&config.pricing.dividend_yield) {
        return invalid("pricing.dividend_yield must be between 0.0 and 1.0");
    }
    if !(config.pricing.default_volatility > 0.0 && config.pricing.default_volatility <= 5.0) {
        return invalid("pricing.default_volatility must be in (0.0, 5.0]");
    }

    // Screening
    config
        .screening
        .strike_selection
        .validate()
        .map_err(ConfigError::ValidationError)?;
    let tiers = &config.screening.tiers;
    if !(tiers.excellent >= tiers.good && tiers.good >= tiers.fair && tiers.fair >= 0.0) {
        return invalid("screening.tiers must satisfy excellent >= good >= fair >= 0");
    }
    if !(config.screening.max_pick_risk > 0.0 && config.screening.max_pick_risk <= 100.0) {
        return invalid("screening.max_pick_risk must be in (0, 100]");
    }

    // Report
    if config.report.max_rows_per_week == 0 || config.report.compact_rows_per_week == 0 {
        return invalid("report row limits must be positive");
    }

    // Notifications
    config
        .notifications
        .validate()
        .map_err(ConfigError::ValidationError)?;

    // Schedule
    let schedule = &config.schedule;
    if schedule.interval_minutes == 0 {
        return invalid("schedule.interval_minutes must be positive");
    }
    if schedule.max_cycle_minutes == 0 {
        return invalid("schedule.max_cycle_minutes must be positive");
    }
    if schedule.market_open_hour >= schedule.market_close_hour || schedule.market_close_hour > 24 {
        return invalid("schedule market hours must satisfy open < close <= 24");
    }

    // Market data
    if config.market_data.base_url.trim().is_empty() {
        return invalid("market_data.base_url must not be empty");
    }
    let retry = &config.market_data.retry;
    if retry.max_attempts == 0 {
        return invalid("market_data.retry.max_attempts must be at least 1");
    }
    if !(retry.multiplier.is_finite() && retry.multiplier >= 1.0) {
        return invalid("market_data.retry.multiplier must be a finite number >= 1.0");
    }
    if !(0.0..=1.0).contains(&retry.jitter_factor) {
        return invalid("market_data.retry.jitter_factor must be between 0.0 and 1.0");
    }
    if retry.initial_backoff_ms > retry.max_backoff_ms {
        return invalid("market_data.retry.initial_backoff_ms must not exceed max_backoff_ms");
    }

    // Logging
    let valid_formats = crate::observability::LOG_FORMATS;
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}
