//! Text renderings of a [`StockReport`].
//!
//! All renderings are pure: the timestamp comes from the quote, never from
//! the clock, so identical input always yields identical text.

use std::fmt::Write as _;

use chrono_tz::Tz;

use crate::config::{Config, MessageFormat};
use crate::domain::{QualityTier, ScoredCandidate, StockReport, WeeklyReport};
use crate::screening::weekly_summary;

use super::values::{
    format_dollars, format_money, format_money_fine, format_pct, format_signed_money,
    format_strike,
};

const RULE_WIDE: usize = 60;
const RULE_NARROW: usize = 50;

/// Layout options.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Rows per week in the full report.
    pub max_rows_per_week: usize,
    /// Rows per week in the compact report.
    pub compact_rows_per_week: usize,
    /// Lowest tier listed in week tables.
    pub min_display_tier: QualityTier,
    /// Timezone for the analysis timestamp.
    pub timezone: Tz,
    /// Risk ceiling used for best picks, quoted in the text.
    pub max_pick_risk: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ReportOptions {
    /// Options from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_rows_per_week: config.report.max_rows_per_week,
            compact_rows_per_week: config.report.compact_rows_per_week,
            min_display_tier: config.report.min_display_tier,
            timezone: config.report.timezone,
            max_pick_risk: config.screening.max_pick_risk,
        }
    }
}

/// Renders stock reports.
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

/// Render the full report with default options.
#[must_use]
pub fn format(report: &StockReport) -> String {
    ReportFormatter::default().full(report)
}

// `write!` into a String cannot fail; results are discarded throughout.
impl ReportFormatter {
    /// Create a formatter.
    #[must_use]
    pub const fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Render in the given format.
    #[must_use]
    pub fn render(&self, report: &StockReport, format: MessageFormat) -> String {
        match format {
            MessageFormat::Full => self.full(report),
            MessageFormat::Compact => self.compact(report),
            MessageFormat::Sms => self.sms(report),
        }
    }

    /// Full report: header, absolute best, weekly summary and per-week tables.
    #[must_use]
    pub fn full(&self, report: &StockReport) -> String {
        let mut out = String::new();
        let symbol = &report.symbol;

        let _ = writeln!(
            out,
            "🚀 OPTIONS ALERT - {symbol} ({}) 🚀",
            format_money(report.quote.current_price)
        );
        let _ = writeln!(out, "⏰ Analysis Time: {}", self.timestamp(report));
        let _ = writeln!(out, "📊 Analyzing: {symbol} Put Options");
        let _ = writeln!(out, "💰 Potential Profit × 100 for actual contract values");
        out.push('\n');

        self.write_absolute_best(&mut out, report);
        self.write_weekly_summary(&mut out, report);

        let _ = writeln!(out, "{}", "=".repeat(RULE_WIDE));
        out.push('\n');
        out.push_str("📊 === DETAILED WEEKLY ANALYSIS === 📊\n\n");

        for week in &report.weeks {
            self.write_week_detail(&mut out, report, week);
            let _ = writeln!(out, "{}", "=".repeat(RULE_NARROW));
            out.push('\n');
        }

        out.trim_end().to_string()
    }

    /// Compact report for push notifications.
    #[must_use]
    pub fn compact(&self, report: &StockReport) -> String {
        let mut out = String::new();
        let symbol = &report.symbol;
        let rows = self.options.compact_rows_per_week;

        let _ = writeln!(out, "🚨 URGENT {symbol} ALERT 🚨");
        out.push_str("⭐ === ABSOLUTE BEST CHOICE === ⭐\n");
        match &report.absolute_best {
            Some(best) => {
                let _ = writeln!(
                    out,
                    "🥇 {symbol} {} - {} Strike → {} profit",
                    best.week_label,
                    format_strike(best.candidate.strike()),
                    format_dollars(best.candidate.premium_per_contract)
                );
            }
            None => {
                let _ = writeln!(out, "{}", self.no_pick_line());
            }
        }
        out.push('\n');

        let _ = writeln!(
            out,
            "📊 === ALL {} WEEKS TOP {rows} STRIKES === 📊",
            report.weeks.len()
        );
        let _ = writeln!(
            out,
            "💰 Current {symbol} Price: {}",
            format_money(report.quote.current_price)
        );
        out.push('\n');

        for week in &report.weeks {
            let _ = writeln!(
                out,
                "📅 WEEK {} - {} ({} days)",
                week.week_number, week.expiration_date, week.days_to_expiry
            );
            if !week.has_data() {
                out.push_str("No data\n\n");
                continue;
            }
            let visible = self.visible(week, rows);
            if visible.is_empty() {
                let _ = writeln!(out, "No strikes rated {} or better", self.options.min_display_tier);
                out.push('\n');
                continue;
            }
            let _ = writeln!(
                out,
                "{:<9} {:<8} {:<9} {:<9} {}",
                "Strike", "Below", "Premium", "Profit", "Risk"
            );
            for c in visible {
                let _ = writeln!(
                    out,
                    "{:<9} {:<8} {:<9} {:<9} {}",
                    format_strike(c.strike()),
                    format_signed_money(-c.otm_amount),
                    format_money(c.premium),
                    format_dollars(c.premium_per_contract),
                    format_pct(c.assignment_probability)
                );
            }
            out.push('\n');
        }

        if let Some(best) = &report.absolute_best {
            let _ = write!(
                out,
                "⭐ BEST: {} {} → {} profit ({} risk)",
                best.week_label,
                format_strike(best.candidate.strike()),
                format_dollars(best.candidate.premium_per_contract),
                format_pct(best.candidate.assignment_probability)
            );
        }

        out.trim_end().to_string()
    }

    /// One-line summary for SMS.
    #[must_use]
    pub fn sms(&self, report: &StockReport) -> String {
        let stamp = report
            .quote
            .timestamp
            .with_timezone(&self.options.timezone)
            .format("%m/%d %H:%M");
        let price = format_money(report.quote.current_price);

        match &report.absolute_best {
            Some(best) => format!(
                "{} {price} - Best: W{} {}P {} ({} risk) {stamp}",
                report.symbol,
                best.week_number,
                format_strike(best.candidate.strike()),
                format_money(best.candidate.premium),
                format_pct(best.candidate.assignment_probability)
            ),
            None => format!(
                "{} {price} - No pick under {} risk {stamp}",
                report.symbol,
                format_pct(self.options.max_pick_risk)
            ),
        }
    }

    fn timestamp(&self, report: &StockReport) -> String {
        report
            .quote
            .timestamp
            .with_timezone(&self.options.timezone)
            .format("%Y-%m-%d %H:%M %Z")
            .to_string()
    }

    fn no_pick_line(&self) -> String {
        format!(
            "No contract under {} assignment risk this run",
            format_pct(self.options.max_pick_risk)
        )
    }

    /// Candidates shown in a week table, in stored order.
    fn visible<'a>(&self, week: &'a WeeklyReport, limit: usize) -> Vec<&'a ScoredCandidate> {
        week.candidates
            .iter()
            .filter(|c| c.quality_tier >= self.options.min_display_tier)
            .take(limit)
            .collect()
    }

    fn write_absolute_best(&self, out: &mut String, report: &StockReport) {
        out.push_str("⭐ === ABSOLUTE BEST CHOICE === ⭐\n");
        let Some(best) = &report.absolute_best else {
            let _ = writeln!(out, "{}", self.no_pick_line());
            out.push('\n');
            return;
        };
        let c = &best.candidate;

        let _ = writeln!(out, "🥇 {} {}", report.symbol, best.week_label);
        let _ = writeln!(out, "📅 Expiration: {}", best.expiration_date);
        let _ = writeln!(
            out,
            "💰 Potential profit: {} per share that would be {}",
            format_money(c.premium),
            format_dollars(c.premium_per_contract)
        );
        let _ = writeln!(out, "🎯 Strike: {}", format_strike(c.strike()));
        let _ = writeln!(
            out,
            "⚠️ Assignment Risk: {}",
            format_pct(c.assignment_probability)
        );
        let _ = writeln!(
            out,
            "⏰ Daily Time Decay: {}",
            format_money_fine(c.daily_time_decay)
        );
        let _ = writeln!(
            out,
            "{} Quality: {} (P/R {})",
            c.quality_tier.emoji(),
            c.quality_tier,
            c.premium_to_risk_ratio
        );
        out.push('\n');
    }

    fn write_weekly_summary(&self, out: &mut String, report: &StockReport) {
        out.push_str("🏆 === WEEKLY BEST PICKS SUMMARY === 🏆\n\n");

        let picks = weekly_summary(&report.weeks);
        if picks.is_empty() {
            let _ = writeln!(out, "{}", self.no_pick_line());
            out.push('\n');
            return;
        }

        for (week, c) in picks {
            let tier = c.quality_tier;
            let _ = writeln!(
                out,
                "{} WEEK {} BEST: {}",
                tier.emoji(),
                week.week_number,
                report.symbol
            );
            let _ = writeln!(out, "   📅 Expiration: {}", week.expiration_date);
            let _ = writeln!(
                out,
                "   💰 Potential Profit: {} or {}",
                format_money(c.premium),
                format_dollars(c.premium_per_contract)
            );
            let _ = writeln!(out, "   🎯 Strike: {}", format_strike(c.strike()));
            let _ = writeln!(
                out,
                "   ⚠️ Assignment Risk: {}",
                format_pct(c.assignment_probability)
            );
            let _ = writeln!(
                out,
                "   ⏰ Daily Time Decay: {}",
                format_money_fine(c.daily_time_decay)
            );
            let _ = writeln!(out, "   {} Quality: {tier}", tier.emoji());
            out.push('\n');
        }
    }

    fn write_week_detail(&self, out: &mut String, report: &StockReport, week: &WeeklyReport) {
        if !week.has_data() {
            let _ = writeln!(
                out,
                "❌ Week {} ({}): No data available",
                week.week_number, week.expiration_date
            );
            if let Some(reason) = &week.unavailable {
                let _ = writeln!(out, "   {reason}");
            }
            out.push('\n');
            return;
        }

        let _ = writeln!(
            out,
            "🗓️ === WEEK {} - {} ({} days) ===",
            week.week_number, week.expiration_date, week.days_to_expiry
        );
        let _ = writeln!(
            out,
            "💰 Current: {} | {} Put Options",
            format_money(report.quote.current_price),
            report.symbol
        );
        out.push('\n');

        let visible = self.visible(week, self.options.max_rows_per_week);
        if visible.is_empty() {
            let _ = writeln!(
                out,
                "⚠️ NO PROFITABLE OPTIONS (nothing rated {} or better)",
                self.options.min_display_tier
            );
            out.push('\n');
            return;
        }

        let _ = writeln!(
            out,
            "{:<9} {:<8} {:<9} {:<9} {:<7} {:<6} {}",
            "Strike", "Below", "Premium", "Profit", "Risk", "P/R", "Quality"
        );
        for c in &visible {
            let _ = writeln!(
                out,
                "{:<9} {:<8} {:<9} {:<9} {:<7} {:<6} {} {}",
                format_strike(c.strike()),
                format_signed_money(-c.otm_amount),
                format_money(c.premium),
                format_dollars(c.premium_per_contract),
                format_pct(c.assignment_probability),
                c.premium_to_risk_ratio.to_string(),
                c.quality_tier.emoji(),
                c.quality_tier
            );
        }
        out.push('\n');

        match &week.best_pick {
            Some(pick) => {
                let _ = writeln!(
                    out,
                    "💡 BEST PICK: {} strike → {}/share = {} ({} risk)",
                    format_strike(pick.strike()),
                    format_money(pick.premium),
                    format_dollars(pick.premium_per_contract),
                    format_pct(pick.assignment_probability)
                );
                let _ = writeln!(
                    out,
                    "   🎯 Quality: {} - {}",
                    pick.quality_tier,
                    pick.quality_tier.explanation()
                );
            }
            None => {
                let _ = writeln!(out, "💡 {}", self.no_pick_line());
            }
        }
        out.push('\n');
    }
}
