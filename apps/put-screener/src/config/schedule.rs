//! Scheduled runner configuration.

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::report::default_timezone;

/// Scheduled runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes between cycles.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    /// Snap hourly (or longer) intervals to the top of the hour.
    #[serde(default = "default_true")]
    pub align_to_hour: bool,
    /// Only run cycles inside the trading window.
    #[serde(default = "default_true")]
    pub market_hours_only: bool,
    /// Run cycles regardless of the trading window (testing).
    #[serde(default)]
    pub ignore_market_hours: bool,
    /// Exchange timezone.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    /// First hour of the trading window, inclusive.
    #[serde(default = "default_open_hour")]
    pub market_open_hour: u32,
    /// Last hour of the trading window, inclusive.
    #[serde(default = "default_close_hour")]
    pub market_close_hour: u32,
    /// Wall-clock budget per cycle in minutes.
    #[serde(default = "default_max_cycle_minutes")]
    pub max_cycle_minutes: u64,
    /// Pause between symbols when notifications are sent, in seconds.
    #[serde(default = "default_symbol_delay_secs")]
    pub symbol_delay_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            align_to_hour: true,
            market_hours_only: true,
            ignore_market_hours: false,
            timezone: default_timezone(),
            market_open_hour: default_open_hour(),
            market_close_hour: default_close_hour(),
            max_cycle_minutes: default_max_cycle_minutes(),
            symbol_delay_secs: default_symbol_delay_secs(),
        }
    }
}

impl ScheduleConfig {
    /// Interval between cycles.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes as u64 * 60)
    }

    /// Per-cycle budget.
    #[must_use]
    pub const fn cycle_budget(&self) -> Duration {
        Duration::from_secs(self.max_cycle_minutes.saturating_mul(60))
    }

    /// Pause between symbols.
    #[must_use]
    pub const fn symbol_delay(&self) -> Duration {
        Duration::from_secs(self.symbol_delay_secs)
    }

    /// Whether the trading window gates cycles.
    #[must_use]
    pub const fn enforces_market_hours(&self) -> bool {
        self.market_hours_only && !self.ignore_market_hours
    }
}

const fn default_true() -> bool {
    true
}

const fn default_interval_minutes() -> u32 {
    60
}

const fn default_open_hour() -> u32 {
    9
}

const fn default_close_hour() -> u32 {
    16
}

const fn default_max_cycle_minutes() -> u64 {
    2
}

const fn default_symbol_delay_secs() -> u64 {
    10
}
