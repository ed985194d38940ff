//! Trading window and tick computation.

use std::time::Duration;

use chrono::{DateTime, Datelike, DurationRound, TimeDelta, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::config::ScheduleConfig;

/// Weekday trading window in an exchange timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketWindow {
    timezone: Tz,
    open_hour: u32,
    close_hour: u32,
}

impl MarketWindow {
    /// Create a window covering `open_hour..=close_hour`, Monday to Friday.
    #[must_use]
    pub const fn new(timezone: Tz, open_hour: u32, close_hour: u32) -> Self {
        Self {
            timezone,
            open_hour,
            close_hour,
        }
    }

    /// Window from schedule configuration.
    #[must_use]
    pub const fn from_config(config: &ScheduleConfig) -> Self {
        Self::new(
            config.timezone,
            config.market_open_hour,
            config.market_close_hour,
        )
    }

    /// Whether `now` falls inside the window. Holidays are not modeled.
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.timezone);
        let weekday = !matches!(local.weekday(), Weekday::Sat | Weekday::Sun);
        weekday && (self.open_hour..=self.close_hour).contains(&local.hour())
    }
}

/// When the cycle after one starting at `now` is due.
///
/// Intervals of an hour or more with `align_to_hour` land on the top of an
/// hour: the current hour is truncated and the interval added. Shorter
/// intervals are never aligned.
#[must_use]
pub fn next_tick(now: DateTime<Utc>, interval: Duration, align_to_hour: bool) -> DateTime<Utc> {
    let step = TimeDelta::from_std(interval).unwrap_or(TimeDelta::hours(1));
    let aligned = align_to_hour && step >= TimeDelta::hours(1);

    let base = if aligned {
        now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now)
    } else {
        now
    };
    base + step
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn window() -> MarketWindow {
        MarketWindow::new(chrono_tz::America::New_York, 9, 16)
    }

    // 2025-08-08 is a Friday; New York is UTC-4 in August.
    #[test_case(2025, 8, 8, 13, 0, true ; "friday 9am")]
    #[test_case(2025, 8, 8, 12, 59, false ; "friday before open")]
    #[test_case(2025, 8, 8, 20, 59, true ; "friday 4pm hour")]
    #[test_case(2025, 8, 8, 21, 0, false ; "friday 5pm")]
    #[test_case(2025, 8, 9, 15, 0, false ; "saturday")]
    #[test_case(2025, 8, 10, 15, 0, false ; "sunday")]
    fn window_membership(y: i32, mo: u32, d: u32, h: u32, mi: u32, open: bool) {
        let now = Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap();
        assert_eq!(window().is_open(now), open);
    }

    #[test]
    fn hourly_ticks_align_to_top_of_hour() {
        let now = Utc.with_ymd_and_hms(2025, 8, 8, 14, 17, 42).unwrap();
        let next = next_tick(now, Duration::from_secs(3600), true);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 8, 8, 15, 0, 0).unwrap());
    }

    #[test]
    fn unaligned_ticks_add_interval() {
        let now = Utc.with_ymd_and_hms(2025, 8, 8, 14, 17, 42).unwrap();
        let next = next_tick(now, Duration::from_secs(3600), false);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 8, 8, 15, 17, 42).unwrap());
    }

    #[test]
    fn short_intervals_are_not_aligned() {
        let now = Utc.with_ymd_and_hms(2025, 8, 8, 14, 17, 0).unwrap();
        let next = next_tick(now, Duration::from_secs(15 * 60), true);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 8, 8, 14, 32, 0).unwrap());
    }
}
